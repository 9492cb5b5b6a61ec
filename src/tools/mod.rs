mod frame_scanner;
mod path_validator;

pub use frame_scanner::{
    FrameNaming, FrameSequence, collect_frame_sequence, discover_frame_range, scan_frames,
};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
