use garde::Validate;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, TypedBuilder, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRequest {
    #[builder(default, setter(into, strip_option))]
    #[garde(skip)]
    pub first_name: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[garde(skip)]
    pub last_name: Option<String>,

    #[builder(default, setter(into, strip_option))]
    #[garde(email)]
    pub email: Option<String>,
}

#[cfg(test)]
mod test {
    use super::ProfileRequest;
    use garde::Validate;
    use pretty_assertions::assert_eq;

    #[test]
    fn email_is_checked_when_present() {
        assert!(ProfileRequest::default().validate().is_ok());
        assert!(ProfileRequest::builder()
            .email("jane@example.com")
            .build()
            .validate()
            .is_ok());
        assert!(ProfileRequest::builder()
            .email("not an email")
            .build()
            .validate()
            .is_err());
    }

    #[test]
    fn camel_case_on_the_wire() {
        let request = ProfileRequest::builder().first_name("Jane").build();
        assert_eq!(
            sonic_rs::to_string(&request).unwrap(),
            r#"{"firstName":"Jane","lastName":null,"email":null}"#
        );
    }
}
