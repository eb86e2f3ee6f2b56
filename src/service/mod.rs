pub mod bid_service;
pub mod collaboration;
pub mod error;
pub mod message_service;
pub mod review_service;
pub mod task_service;
