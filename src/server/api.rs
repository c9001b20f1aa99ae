use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_typed_multipart::TypedMultipart;
use log::info;

use super::error::{AppError, Result};
use super::state::AppState;
use super::types::*;
use crate::attributes::{parse_attributes, parse_attributes_str};
use crate::catalog::{AddAnimal, UploadedImage};
use crate::db::AnimalRecord;
use crate::error::Error;
use crate::metrics;

/// 通过图片识别动物
#[utoipa::path(
    post,
    path = "/api/classify-image",
    request_body(content = ClassifyImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "找到可信的匹配"),
        (status = 400, description = "没有上传图片"),
        (status = 404, description = "没有足够相似的动物"),
    )
)]
pub async fn classify_image_handler(
    State(state): State<Arc<AppState>>,
    TypedMultipart(data): TypedMultipart<ClassifyImageRequest>,
) -> Result<Response> {
    let Some(image) = data.image else {
        return Err(AppError::bad_request("No image file provided"));
    };
    if image.metadata.file_name.as_deref().is_none_or(str::is_empty) {
        return Err(AppError::bad_request("Empty filename"));
    }

    info!("正在识别上传图片: {:?}", image.metadata.file_name);
    let best = state.catalog.identify_image(image.contents.to_vec()).await?;

    match best {
        Some(best) if best.score >= state.threshold => {
            metrics::inc_classify_count("image", "found");
            Ok(Json(MatchResponse {
                mode: "image",
                source: Some("database"),
                match_score: best.score,
                animal: best.animal,
            })
            .into_response())
        }
        best => {
            metrics::inc_classify_count("image", "not_found");
            let response = NoMatchResponse {
                error: "No similar animal found in database",
                message: "The uploaded image doesn't match any animal in Faunara's database. \
                          Consider adding this animal using the 'Improve Faunara' section.",
                match_score: best.map(|b| b.score),
                suggestion: "Add this animal to help Faunara learn",
            };
            Ok((StatusCode::NOT_FOUND, Json(response)).into_response())
        }
    }
}

/// 通过属性识别动物
#[utoipa::path(
    post,
    path = "/api/classify-attributes",
    request_body = ClassifyAttributesRequest,
    responses(
        (status = 200, description = "得分最高的动物，得分可能为 0"),
        (status = 400, description = "属性格式错误"),
        (status = 404, description = "数据库中没有动物"),
    )
)]
pub async fn classify_attributes_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<MatchResponse>> {
    // 请求体不是合法 JSON 时按空属性处理
    let request: ClassifyAttributesRequest = serde_json::from_slice(&body).unwrap_or_default();
    let query = parse_attributes(&request.attributes)?;

    let best = state.catalog.classify_attributes(&query).await.inspect_err(|e| {
        if matches!(e.downcast_ref::<Error>(), Some(Error::EmptyCatalog)) {
            metrics::inc_classify_count("attributes", "empty");
        }
    })?;
    metrics::inc_classify_count("attributes", "found");

    Ok(Json(MatchResponse {
        mode: "attributes",
        source: None,
        match_score: best.score,
        animal: best.animal,
    }))
}

/// 添加动物到数据库
#[utoipa::path(
    post,
    path = "/api/improve-faunara",
    request_body(content = AddAnimalForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, body = AddAnimalResponse),
        (status = 400, description = "名称缺失或属性格式错误"),
    )
)]
pub async fn add_animal_handler(
    State(state): State<Arc<AppState>>,
    TypedMultipart(data): TypedMultipart<AddAnimalRequest>,
) -> Result<Json<AddAnimalResponse>> {
    let name = data.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }
    let attributes = parse_attributes_str(data.attributes.as_deref())?;

    // 文件名为空视为没有上传图片
    let image = data
        .image
        .filter(|image| image.metadata.file_name.as_deref().is_some_and(|name| !name.is_empty()))
        .map(|image| UploadedImage {
            file_name: image.metadata.file_name,
            contents: image.contents.to_vec(),
        });

    let id = state
        .catalog
        .add_animal(AddAnimal {
            name,
            habitat: data.habitat.unwrap_or_default(),
            facts: data.facts.unwrap_or_default(),
            attributes,
            image,
        })
        .await?;

    Ok(Json(AddAnimalResponse { message: "Animal added to Faunara", id }))
}

/// 列出数据库中的所有动物
#[utoipa::path(get, path = "/api/animals", responses((status = 200, description = "动物列表")))]
pub async fn list_animals_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AnimalRecord>>> {
    Ok(Json(state.catalog.animals().await?))
}

/// 获取单个动物
#[utoipa::path(
    get,
    path = "/api/animals/{id}",
    params(("id" = i64, Path, description = "动物 ID")),
    responses(
        (status = 200, description = "动物信息"),
        (status = 404, description = "动物不存在"),
    )
)]
pub async fn get_animal_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<AnimalRecord>> {
    state
        .catalog
        .animal(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Animal {id} not found")))
}

pub async fn not_found_handler() -> AppError {
    AppError::not_found("Endpoint not found")
}
