//! 图片特征提取

use std::sync::Arc;

use anyhow::Result;

/// 将图片转换为固定长度特征向量的能力
///
/// 同一个实现对同一张图片的输出必须是确定的，且输出维度在进程生命周期内不变
pub trait FeatureProvider: Send + Sync {
    /// 特征向量的维度
    fn dimension(&self) -> usize;

    /// 从编码后的图片数据（jpg、png 等）中提取特征向量
    fn extract(&self, image: &[u8]) -> Result<Vec<f32>>;
}

/// 返回当前编译配置下的默认特征提取器
#[cfg(feature = "opencv")]
pub fn default_provider() -> Result<Arc<dyn FeatureProvider>> {
    Ok(Arc::new(ColorLayoutExtractor::default()))
}

#[cfg(not(feature = "opencv"))]
pub fn default_provider() -> Result<Arc<dyn FeatureProvider>> {
    Err(anyhow::anyhow!("编译时未启用 opencv 特性，无法提取图片特征"))
}

#[cfg(feature = "opencv")]
pub use self::color_layout::ColorLayoutExtractor;

#[cfg(feature = "opencv")]
mod color_layout {
    use anyhow::{Result, bail};
    use opencv::core::{Size, Vector};
    use opencv::imgcodecs;
    use opencv::imgproc;
    use opencv::prelude::*;

    use super::FeatureProvider;

    /// 计算颜色直方图前缩放到的尺寸
    const GRID: i32 = 32;
    /// 灰度缩略图的边长
    const THUMB: i32 = 16;
    const HUE_BINS: usize = 12;
    const SAT_BINS: usize = 4;
    const VAL_BINS: usize = 8;

    /// 基于颜色分布和灰度布局的特征提取器
    ///
    /// 特征由三部分拼接而成：
    /// - 色相 × 饱和度联合直方图
    /// - 明度直方图
    /// - 去均值后的灰度缩略图
    #[derive(Debug, Default, Clone, Copy)]
    pub struct ColorLayoutExtractor;

    impl FeatureProvider for ColorLayoutExtractor {
        fn dimension(&self) -> usize {
            HUE_BINS * SAT_BINS + VAL_BINS + (THUMB * THUMB) as usize
        }

        fn extract(&self, image: &[u8]) -> Result<Vec<f32>> {
            let buf = Vector::<u8>::from_slice(image);
            let img = imgcodecs::imdecode(&buf, imgcodecs::IMREAD_COLOR)?;
            if img.empty() {
                bail!("无法解码图片");
            }

            let mut small = Mat::default();
            imgproc::resize(&img, &mut small, Size::new(GRID, GRID), 0.0, 0.0, imgproc::INTER_AREA)?;
            let mut hsv = Mat::default();
            imgproc::cvt_color_def(&small, &mut hsv, imgproc::COLOR_BGR2HSV)?;

            let mut gray = Mat::default();
            imgproc::cvt_color_def(&img, &mut gray, imgproc::COLOR_BGR2GRAY)?;
            let mut thumb = Mat::default();
            imgproc::resize(&gray, &mut thumb, Size::new(THUMB, THUMB), 0.0, 0.0, imgproc::INTER_AREA)?;

            let mut features = Vec::with_capacity(self.dimension());
            features.extend(color_histogram(hsv.data_bytes()?));
            features.extend(gray_layout(thumb.data_bytes()?));
            Ok(features)
        }
    }

    /// 输入为 8 位 HSV 像素（H 范围 0..180），输出归一化后的直方图
    pub(super) fn color_histogram(hsv: &[u8]) -> Vec<f32> {
        let mut hs = [0f32; HUE_BINS * SAT_BINS];
        let mut v = [0f32; VAL_BINS];
        let pixels = hsv.chunks_exact(3);
        let total = pixels.len().max(1) as f32;

        for px in pixels {
            let h = (px[0] as usize * HUE_BINS / 180).min(HUE_BINS - 1);
            let s = px[1] as usize * SAT_BINS / 256;
            hs[h * SAT_BINS + s] += 1.0;
            v[px[2] as usize * VAL_BINS / 256] += 1.0;
        }

        hs.iter().chain(&v).map(|n| n / total).collect()
    }

    /// 灰度缩略图减去均值并缩放到 [-1, 1]
    pub(super) fn gray_layout(gray: &[u8]) -> Vec<f32> {
        let mean = gray.iter().map(|&x| x as f32).sum::<f32>() / gray.len().max(1) as f32;
        gray.iter().map(|&x| (x as f32 - mean) / 255.0).collect()
    }
}

#[cfg(all(test, feature = "opencv"))]
mod tests {
    use opencv::core::{CV_8UC3, Scalar, Vector};
    use opencv::imgcodecs;
    use opencv::prelude::*;

    use super::color_layout::{color_histogram, gray_layout};
    use super::*;
    use crate::similarity::cosine_similarity;

    /// 色相 12 段 × 饱和度 4 段
    const HS_LEN: usize = 48;

    fn encode_png(color: (f64, f64, f64)) -> Vec<u8> {
        let img = Mat::new_rows_cols_with_default(64, 48, CV_8UC3, Scalar::new(color.0, color.1, color.2, 0.0))
            .unwrap();
        let mut buf = Vector::<u8>::new();
        imgcodecs::imencode(".png", &img, &mut buf, &Vector::new()).unwrap();
        buf.to_vec()
    }

    #[test]
    fn test_histogram_normalized() {
        let hsv = [0u8, 0, 0, 179, 255, 255, 90, 128, 64];
        let hist = color_histogram(&hsv);
        assert_eq!(hist.len(), HS_LEN + 8);
        let hs_sum: f32 = hist[..HS_LEN].iter().sum();
        let v_sum: f32 = hist[HS_LEN..].iter().sum();
        assert!((hs_sum - 1.0).abs() < 1e-6);
        assert!((v_sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_gray_layout_centered() {
        let layout = gray_layout(&[0, 255, 0, 255]);
        assert_eq!(layout, vec![-0.5, 0.5, -0.5, 0.5]);
    }

    #[test]
    fn test_extract_dimension_and_determinism() {
        let extractor = ColorLayoutExtractor;
        let png = encode_png((255.0, 0.0, 0.0));
        let a = extractor.extract(&png).unwrap();
        let b = extractor.extract(&png).unwrap();
        assert_eq!(a.len(), extractor.dimension());
        assert_eq!(a, b);
    }

    #[test]
    fn test_extract_separates_colors() {
        let extractor = ColorLayoutExtractor;
        let blue = extractor.extract(&encode_png((255.0, 0.0, 0.0))).unwrap();
        let blue2 = extractor.extract(&encode_png((250.0, 5.0, 5.0))).unwrap();
        let green = extractor.extract(&encode_png((0.0, 255.0, 0.0))).unwrap();
        assert!(cosine_similarity(&blue, &blue2) > cosine_similarity(&blue, &green));
    }

    #[test]
    fn test_extract_invalid_image() {
        assert!(ColorLayoutExtractor.extract(b"definitely not an image").is_err());
    }
}
