use super::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct User {
    pub(crate) id: ObjectId,
    pub(crate) username: String,
    pub(crate) fullname: Option<String>,
    pub(crate) avatar: Option<String>,
}
