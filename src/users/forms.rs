use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    /// Kept as raw text so a malformed value can be answered with 400.
    pub group_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    pub is_admin: Option<String>,
}

impl CreateUserForm {
    pub fn is_admin(&self) -> bool {
        self.is_admin.is_some()
    }
}

/// The edit form repeats `group_id` once per checked group, which the
/// struct-based form extractor cannot collect, so the body is parsed by hand.
#[derive(Debug, Default, PartialEq)]
pub struct EditUserForm {
    pub full_name: String,
    pub is_admin: bool,
    pub group_ids: Vec<String>,
}

impl EditUserForm {
    pub fn parse(body: &[u8]) -> Self {
        let mut form = EditUserForm::default();
        for (key, value) in url::form_urlencoded::parse(body) {
            match key.as_ref() {
                "full_name" => form.full_name = value.into_owned(),
                "is_admin" => form.is_admin = true,
                "group_id" => form.group_ids.push(value.into_owned()),
                _ => {}
            }
        }
        form
    }
}
