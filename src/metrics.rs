use std::sync::LazyLock;

use prometheus::*;

static METRIC_CLASSIFY_COUNT: LazyLock<IntCounterVec> = LazyLock::new(|| {
    register_int_counter_vec!(
        "faunara_classify_count",
        "count of the classification requests",
        &["mode", "outcome"]
    )
    .unwrap()
});

static METRIC_MATCH_SCORE: LazyLock<HistogramVec> = LazyLock::new(|| {
    register_histogram_vec!(
        "faunara_match_score",
        "best match score of the classification requests",
        &["mode"],
        (-10..=10).map(|x| x as f64 / 10.0).collect()
    )
    .unwrap()
});

static METRIC_ANIMAL_ADDED_COUNT: LazyLock<IntCounter> = LazyLock::new(|| {
    register_int_counter!("faunara_animal_added_count", "count of the animals added").unwrap()
});

/// 记录一次识别请求，`outcome` 为 found / not_found / empty
pub fn inc_classify_count(mode: &str, outcome: &str) {
    METRIC_CLASSIFY_COUNT.with_label_values(&[mode, outcome]).inc();
}

/// 记录最佳匹配得分
pub fn observe_match_score(mode: &str, score: f64) {
    METRIC_MATCH_SCORE.with_label_values(&[mode]).observe(score);
}

pub fn inc_animal_added() {
    METRIC_ANIMAL_ADDED_COUNT.inc();
}
