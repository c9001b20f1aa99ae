use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use tokio::task::spawn_blocking;

use crate::attributes::Attributes;
use crate::config::ConfDir;
use crate::db::{self, AnimalRecord, Database, NewAnimal, crud};
use crate::describe::DescriptionProvider;
use crate::error::Error;
use crate::feature::{self, FeatureProvider};
use crate::metrics;
use crate::similarity::{self, Match};

/// 匹配得分最高的动物
#[derive(Debug, Clone)]
pub struct BestMatch {
    pub animal: AnimalRecord,
    pub score: f64,
}

impl From<Match<'_>> for BestMatch {
    fn from(m: Match<'_>) -> Self {
        Self { animal: m.record.clone(), score: m.score }
    }
}

/// 上传的图片
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// 原始文件名，只用于保留扩展名
    pub file_name: Option<String>,
    pub contents: Vec<u8>,
}

/// 添加动物的请求
#[derive(Debug, Clone, Default)]
pub struct AddAnimal {
    pub name: String,
    pub habitat: String,
    pub facts: String,
    pub attributes: Attributes,
    pub image: Option<UploadedImage>,
}

pub struct CatalogBuilder {
    conf_dir: ConfDir,
    features: Option<Arc<dyn FeatureProvider>>,
    describer: Option<Arc<dyn DescriptionProvider>>,
}

impl CatalogBuilder {
    pub fn new(conf_dir: ConfDir) -> Self {
        Self { conf_dir, features: None, describer: None }
    }

    /// 图片特征提取器，不设置时无法处理图片
    pub fn features(mut self, features: Arc<dyn FeatureProvider>) -> Self {
        self.features = Some(features);
        self
    }

    /// 使用默认特征提取器，不可用时只记录警告，之后的图片请求会返回错误
    pub fn default_features(mut self) -> Self {
        match feature::default_provider() {
            Ok(features) => self.features = Some(features),
            Err(e) => warn!("图片识别不可用: {e:#}"),
        }
        self
    }

    /// 描述补全服务
    pub fn describer(mut self, describer: Option<Arc<dyn DescriptionProvider>>) -> Self {
        self.describer = describer;
        self
    }

    pub async fn open(self) -> Result<Catalog> {
        tokio::fs::create_dir_all(self.conf_dir.uploads())
            .await
            .with_context(|| format!("无法创建目录: {}", self.conf_dir.uploads().display()))?;
        let db = db::init_db(self.conf_dir.database()).await?;
        Ok(Catalog {
            conf_dir: self.conf_dir,
            db,
            features: self.features,
            describer: self.describer,
        })
    }
}

/// 动物图鉴，负责存储、特征提取和匹配
pub struct Catalog {
    conf_dir: ConfDir,
    db: Database,
    features: Option<Arc<dyn FeatureProvider>>,
    describer: Option<Arc<dyn DescriptionProvider>>,
}

impl Catalog {
    pub fn uploads_dir(&self) -> PathBuf {
        self.conf_dir.uploads()
    }

    /// 数据库中所有动物的快照
    pub async fn animals(&self) -> Result<Vec<AnimalRecord>> {
        Ok(crud::get_all_animals(&self.db).await?)
    }

    pub async fn animal(&self, id: i64) -> Result<Option<AnimalRecord>> {
        Ok(crud::get_animal(&self.db, id).await?)
    }

    pub async fn count(&self) -> Result<i64> {
        Ok(crud::count_animals(&self.db).await?)
    }

    /// 在阻塞线程池中提取图片特征
    pub async fn extract(&self, image: Vec<u8>) -> Result<Vec<f32>> {
        let features = self.features.clone().ok_or_else(|| anyhow!("未配置图片特征提取器"))?;
        spawn_blocking(move || features.extract(&image)).await?
    }

    /// 使用已提取的特征向量查找最相似的动物
    pub async fn match_vector(&self, query: &[f32]) -> Result<Option<BestMatch>> {
        if let Err(e) = similarity::validate_query(query) {
            debug!("跳过图片匹配: {e}");
            return Ok(None);
        }
        let animals = self.animals().await?;
        let best = similarity::find_best_image_match(query, &animals).map(BestMatch::from);
        if let Some(best) = &best {
            info!("图片最佳匹配: {} ({:.4})", best.animal.name, best.score);
            metrics::observe_match_score("image", best.score);
        }
        Ok(best)
    }

    /// 通过图片查找最相似的动物，是否可信由调用方根据阈值判断
    pub async fn identify_image(&self, image: Vec<u8>) -> Result<Option<BestMatch>> {
        let query = self.extract(image).await?;
        self.match_vector(&query).await
    }

    /// 通过属性查找最相近的动物，数据库为空时返回 [`Error::EmptyCatalog`]
    pub async fn classify_attributes(&self, query: &Attributes) -> Result<BestMatch> {
        let animals = self.animals().await?;
        let best = similarity::find_best_attribute_match(query, &animals)
            .map(BestMatch::from)
            .ok_or(Error::EmptyCatalog)?;
        info!("属性最佳匹配: {} ({:.4})", best.animal.name, best.score);
        metrics::observe_match_score("attributes", best.score);
        Ok(best)
    }

    /// 保存上传的图片，文件名为内容哈希，返回保存路径
    pub async fn save_image(&self, image: &UploadedImage) -> Result<PathBuf> {
        let ext = image
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_else(|| "jpg".to_string());
        let hash = blake3::hash(&image.contents);
        let path = self.uploads_dir().join(format!("{}.{ext}", &hash.to_hex()[..32]));
        tokio::fs::write(&path, &image.contents).await?;
        debug!("图片已保存: {}", path.display());
        Ok(path)
    }

    /// 添加动物，返回新记录的 ID
    ///
    /// 附带图片时会先提取特征并保存图片，再补全描述并写入数据库
    pub async fn add_animal(&self, request: AddAnimal) -> Result<i64> {
        let AddAnimal { name, mut habitat, mut facts, attributes, image } = request;
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(Error::MissingName.into());
        }

        // 先提取特征，图片无法处理时不会留下文件，也不会请求描述服务
        let (image_path, feature_vector) = match image {
            Some(image) => {
                let processed = async move {
                    let features = self.extract(image.contents.clone()).await?;
                    let path = self.save_image(&image).await?;
                    anyhow::Ok((path, features))
                };
                let (path, features) = processed.await.context("Failed to process image")?;
                (Some(path.to_string_lossy().into_owned()), Some(features))
            }
            None => (None, None),
        };

        if habitat.trim().is_empty() || facts.trim().is_empty() {
            if let Some(describer) = &self.describer {
                match describer.describe(&name).await {
                    Ok(description) => {
                        if habitat.trim().is_empty() {
                            habitat = description.habitat;
                        }
                        if facts.trim().is_empty() {
                            facts = description.facts;
                        }
                    }
                    Err(e) => warn!("无法获取 {name} 的描述: {e:#}"),
                }
            }
        }

        let animal = NewAnimal { name, habitat, facts, attributes, image_path, feature_vector };
        let id = crud::insert_animal(&self.db, &animal)
            .await
            .context("Failed to save animal to database")?;
        info!("已添加动物: {} (id = {id})", animal.name);
        metrics::inc_animal_added();
        Ok(id)
    }
}
