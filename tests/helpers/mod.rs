// ==========================================
// 集成测试用 Mock 实现
// ==========================================

#![allow(dead_code)]

pub mod mock_config;
pub mod mock_store;

pub use mock_config::MockConfig;
pub use mock_store::MockStore;
