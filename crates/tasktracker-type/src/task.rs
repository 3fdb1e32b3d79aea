use crate::tag::Tag;
use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use typed_builder::TypedBuilder;

#[derive(
    AsRefStr, Clone, Copy, Debug, Default, Deserialize, Display, EnumString, PartialEq, Eq, Serialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Deserialize, Serialize, TypedBuilder, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    #[builder(setter(into))]
    #[garde(custom(crate::not_blank))]
    pub title: String,

    #[builder(default, setter(into, strip_option))]
    #[garde(skip)]
    pub description: Option<String>,

    #[builder(default)]
    #[serde(default)]
    #[garde(skip)]
    pub status: TaskStatus,
}

#[cfg(test)]
mod test {
    use super::{Task, TaskRequest, TaskStatus};
    use garde::Validate;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_wire_format() {
        assert_eq!(
            sonic_rs::to_string(&TaskStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!(TaskStatus::Todo.to_string(), "TODO");
    }

    #[test]
    fn deserialise_task() {
        let task: Task = sonic_rs::from_str(
            r##"{
                "id": 7,
                "title": "Write report",
                "description": null,
                "status": "DONE",
                "createdAt": "2024-05-01T10:00:00",
                "updatedAt": "2024-05-02T11:30:00",
                "tags": [{ "id": 1, "name": "work", "color": "#FF5733" }]
            }"##,
        )
        .unwrap();

        assert_eq!(task.id, Some(7));
        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.tags.len(), 1);
        assert_eq!(task.tags[0].name, "work");
    }

    #[test]
    fn missing_status_defaults_to_todo() {
        let request: TaskRequest = sonic_rs::from_str(r#"{ "title": "x" }"#).unwrap();
        assert_eq!(request.status, TaskStatus::Todo);
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(TaskRequest::builder().title("   ").build().validate().is_err());
        assert!(TaskRequest::builder().title("Buy milk").build().validate().is_ok());
    }
}
