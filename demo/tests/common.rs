use stable_event_demo::config::log_level;

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() { let _ = tracing_subscriber::fmt().with_max_level(log_level()).with_test_writer().try_init(); }
