//! 相似度计算
//!
//! 图片查询使用特征向量的余弦相似度，属性查询使用属性重叠评分，
//! 两者都通过 [`best_of`] 从候选中选出得分最高的一条记录。

use serde_json::Value;

use crate::attributes::{AttributeValue, Attributes};
use crate::db::AnimalRecord;
use crate::error::{Error, Result};

/// 一次匹配的结果
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub record: &'a AnimalRecord,
    pub score: f64,
}

/// 遍历一次候选集合，返回得分最高的元素及其得分
///
/// 只有严格大于当前最高分时才会替换，因此得分相同时保留最先出现的元素。
/// `score` 返回 `None` 的元素会被跳过。
pub fn best_of<T, I, F>(candidates: I, mut score: F) -> Option<(T, f64)>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> Option<f64>,
{
    candidates.into_iter().fold(None, |best, item| match score(&item) {
        Some(s) if best.as_ref().is_none_or(|&(_, b)| s > b) => Some((item, s)),
        _ => best,
    })
}

/// 余弦相似度
///
/// 任一向量为空、长度不一致或者模为 0 时返回 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    // 使用 f64 累加，避免大数值时溢出
    let (dot, norm_a, norm_b) =
        a.iter().zip(b).fold((0.0f64, 0.0f64, 0.0f64), |(dot, na, nb), (&x, &y)| {
            let (x, y) = (x as f64, y as f64);
            (dot + x * y, na + x * x, nb + y * y)
        });

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return 0.0;
    }
    dot / denom
}

/// 检查查询向量是否可用于匹配
pub fn validate_query(query: &[f32]) -> Result<()> {
    if query.is_empty() || !query.iter().all(|x| x.is_finite()) {
        return Err(Error::NoUsableQuery);
    }
    Ok(())
}

/// 将任意嵌套的 JSON 数组展开为一维向量，出现非数值元素时返回 `None`
pub fn flatten_vector(value: &Value) -> Option<Vec<f32>> {
    fn walk(value: &Value, out: &mut Vec<f32>) -> Option<()> {
        match value {
            Value::Number(n) => {
                let x = n.as_f64()? as f32;
                x.is_finite().then(|| out.push(x))
            }
            Value::Array(items) => items.iter().try_for_each(|item| walk(item, out)),
            _ => None,
        }
    }

    let mut out = Vec::new();
    walk(value, &mut out)?;
    Some(out)
}

/// 在候选记录中寻找与查询向量最相似的一条
///
/// 没有特征向量或者向量维度与查询不一致的记录不参与比较
pub fn find_best_image_match<'a>(query: &[f32], candidates: &'a [AnimalRecord]) -> Option<Match<'a>> {
    validate_query(query).ok()?;

    best_of(candidates, |record| {
        let vector = record.feature_vector.as_deref()?;
        (vector.len() == query.len()).then(|| cosine_similarity(query, vector))
    })
    .map(|(record, score)| Match { record, score })
}

/// 单个属性的相似度，能解析为数值时比较相对差距，否则比较规范化后的字符串
fn value_similarity(query: &AttributeValue, candidate: &AttributeValue) -> f64 {
    match (query.as_number(), candidate.as_number()) {
        (Some(q), Some(a)) => (1.0 - (q - a).abs() / a.abs().max(1.0)).max(0.0),
        _ if query.normalized() == candidate.normalized() => 1.0,
        _ => 0.0,
    }
}

/// 属性相似度，取查询与候选共有属性得分的平均值
///
/// 候选中不存在的属性会被忽略，而不是记为 0 分
pub fn attribute_similarity(query: &Attributes, candidate: &Attributes) -> f64 {
    let (total, count) = query
        .iter()
        .filter_map(|(key, q)| candidate.get(key).map(|a| value_similarity(q, a)))
        .fold((0.0, 0usize), |(total, count), score| (total + score, count + 1));

    if count == 0 {
        return 0.0;
    }
    total / count as f64
}

/// 在候选记录中寻找属性最相近的一条
///
/// 只有候选为空时才返回 `None`，即使所有候选得分都是 0 也会返回第一条
pub fn find_best_attribute_match<'a>(
    query: &Attributes,
    candidates: &'a [AnimalRecord],
) -> Option<Match<'a>> {
    best_of(candidates, |record| Some(attribute_similarity(query, &record.attributes)))
        .map(|(record, score)| Match { record, score })
}
