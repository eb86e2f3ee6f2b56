pub mod jobmodel;
pub mod messagemodel;
pub mod reviewmodel;
pub mod taskmodel;
pub mod usermodel;
