#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result, anyhow};
use faunara::config::ConfDir;
use faunara::describe::{Description, DescriptionProvider};
use faunara::feature::FeatureProvider;
use faunara::{Catalog, CatalogBuilder};
use futures::future::BoxFuture;
use tempfile::TempDir;

/// 把 `"1,0.5,-2"` 这样的文本当作“图片”，直接解析为特征向量
pub struct CsvFeatures;

impl FeatureProvider for CsvFeatures {
    fn dimension(&self) -> usize {
        0
    }

    fn extract(&self, image: &[u8]) -> Result<Vec<f32>> {
        let text = std::str::from_utf8(image).context("not utf-8")?;
        text.split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<f32>().map_err(|e| anyhow!("bad component {s:?}: {e}")))
            .collect()
    }
}

/// 返回固定描述，并记录调用次数
#[derive(Default)]
pub struct FixedDescriber {
    pub calls: AtomicUsize,
}

impl FixedDescriber {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DescriptionProvider for FixedDescriber {
    fn describe<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Description>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            Ok(Description {
                habitat: format!("{name} habitat"),
                facts: format!("{name} facts"),
            })
        })
    }
}

/// 总是失败的描述服务
pub struct FailingDescriber;

impl DescriptionProvider for FailingDescriber {
    fn describe<'a>(&'a self, _name: &'a str) -> BoxFuture<'a, Result<Description>> {
        Box::pin(async { Err(anyhow!("service unavailable")) })
    }
}

pub async fn open_catalog(dir: &TempDir) -> Catalog {
    CatalogBuilder::new(ConfDir::new(dir.path()))
        .features(Arc::new(CsvFeatures))
        .open()
        .await
        .unwrap()
}
