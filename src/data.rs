use serde::Deserialize;

pub mod course;
pub mod student;

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct IdForm {
    pub id: u32,
}
