use sqlx::types::Json;
use sqlx::{Executor, Result, Sqlite};

use super::{AnimalRecord, AnimalRow, NewAnimal};

/// 添加动物记录，返回新记录的 ID
pub async fn insert_animal<'c, E>(executor: E, animal: &NewAnimal) -> Result<i64>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO animals (name, habitat, facts, attributes, image_path, feature_vector)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&animal.name)
    .bind(&animal.habitat)
    .bind(&animal.facts)
    .bind(Json(&animal.attributes))
    .bind(animal.image_path.as_deref())
    .bind(animal.feature_vector.as_ref().map(Json))
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

/// 获取所有动物记录，按 ID 升序排列
pub async fn get_all_animals<'c, E>(executor: E) -> Result<Vec<AnimalRecord>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows = sqlx::query_as::<_, AnimalRow>(
        r#"
        SELECT id, name, habitat, facts, attributes, image_path, feature_vector
        FROM animals ORDER BY id ASC
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(AnimalRecord::from).collect())
}

/// 根据 ID 获取动物记录
pub async fn get_animal<'c, E>(executor: E, id: i64) -> Result<Option<AnimalRecord>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, AnimalRow>(
        r#"
        SELECT id, name, habitat, facts, attributes, image_path, feature_vector
        FROM animals WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(row.map(AnimalRecord::from))
}

/// 查询数据库中的动物数量
pub async fn count_animals<'c, E>(executor: E) -> Result<i64>
where
    E: Executor<'c, Database = Sqlite>,
{
    sqlx::query_scalar(r#"SELECT COUNT(*) FROM animals"#).fetch_one(executor).await
}
