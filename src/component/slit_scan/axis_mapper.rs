//! 軸向映射
//!
//! 將 N 張來源影像映射到長度為 D 像素的目標軸上，
//! 每張影像分到的寬度相差至多 1 像素，且所有切片恰好鋪滿整條軸。

use anyhow::{Result, bail};

/// 單一來源影像在目標軸上的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub index: usize,
    pub offset: usize,
    pub width: usize,
}

impl Band {
    #[must_use]
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }
}

/// 計算第 `index` 張影像的切片寬度
///
/// `width(i) = floor(ratio * (i + 1)) - floor(ratio * i)`，以整數運算求值。
/// 相鄰兩項共用同一個取整端點，因此總和必定等於 `larger_length`。
#[must_use]
pub fn mapping_width(smaller_count: usize, larger_length: usize, index: usize) -> usize {
    debug_assert!(smaller_count > 0, "smaller_count must be positive");
    debug_assert!(index < smaller_count, "index out of range");

    if smaller_count == larger_length {
        return 1;
    }

    boundary(smaller_count, larger_length, index + 1)
        - boundary(smaller_count, larger_length, index)
}

/// `floor(larger_length * index / smaller_count)`
fn boundary(smaller_count: usize, larger_length: usize, index: usize) -> usize {
    let scaled = larger_length as u128 * index as u128 / smaller_count as u128;
    scaled as usize
}

/// 一次執行所需的完整映射
#[derive(Debug, Clone)]
pub struct AxisMapping {
    bands: Vec<Band>,
    axis_length: usize,
}

impl AxisMapping {
    pub fn new(source_count: usize, axis_length: usize) -> Result<Self> {
        if source_count == 0 {
            bail!("來源影像數量必須大於 0");
        }

        let mut offset = 0;
        let bands = (0..source_count)
            .map(|index| {
                let width = mapping_width(source_count, axis_length, index);
                let band = Band {
                    index,
                    offset,
                    width,
                };
                offset += width;
                band
            })
            .collect();

        Ok(Self { bands, axis_length })
    }

    #[must_use]
    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    #[must_use]
    pub fn band(&self, index: usize) -> Option<Band> {
        self.bands.get(index).copied()
    }

    #[must_use]
    pub fn widths(&self) -> Vec<usize> {
        self.bands.iter().map(|band| band.width).collect()
    }

    #[must_use]
    pub const fn axis_length(&self) -> usize {
        self.axis_length
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }
}
