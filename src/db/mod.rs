pub mod biddb;
pub mod db;
pub mod jobdb;
pub mod messagedb;
pub mod reviewdb;
pub mod taskdb;
pub mod userdb;
