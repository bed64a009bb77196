mod intake_dto;

pub use intake_dto::{CategorizeRequestDto, IssueTextRequestDto};
