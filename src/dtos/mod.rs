pub mod jobdtos;
pub mod messagedtos;
pub mod reviewdtos;
pub mod taskdtos;
pub mod userdtos;
