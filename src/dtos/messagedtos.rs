use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::messagemodel::Message;

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageDto {
    #[validate(length(
        min = 1,
        max = 5000,
        message = "Message must be between 1-5000 characters"
    ))]
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponseDto {
    pub status: String,
    pub data: Message,
}

#[derive(Debug, Serialize)]
pub struct MessageListResponseDto {
    pub status: String,
    pub data: Vec<Message>,
    pub results: usize,
}
