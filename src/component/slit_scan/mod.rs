//! 縮時切片合成元件
//!
//! 四階段流程：
//! A. 依命名規則建立影像序列
//! B. 依 EXIF 方向決定切片方向
//! C. 平行擷取切片並組裝
//! D. 旋轉並儲存合成圖

mod axis_mapper;
mod composite_writer;
mod frame_source;
mod main;
mod orientation;
mod slice_assembler;

pub use axis_mapper::{AxisMapping, Band, mapping_width};
pub use composite_writer::{composite_file_name, save_composite};
pub use frame_source::{FileFrameSource, FrameSource, MemoryFrameSource};
pub use main::{GenerationResult, SlitScanGenerator};
pub use orientation::{CompositePlan, read_orientation};
pub use slice_assembler::{
    AssemblerOptions, AssemblyError, BandOrientation, DEFAULT_BATCH_SIZE, DEFAULT_WORKER_COUNT,
    SliceAssembler,
};
