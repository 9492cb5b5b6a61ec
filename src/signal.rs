use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 安裝 Ctrl-C 處理器，收到中斷後組裝器會在下一個檢查點停止
#[must_use]
pub fn setup_shutdown_signal() -> Arc<AtomicBool> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        signal_clone.store(true, Ordering::SeqCst);
        eprintln!("\n收到中斷信號，等待進行中的影像處理結束...");
    })
    .expect("無法設定 Ctrl-C 處理器");

    shutdown_signal
}
