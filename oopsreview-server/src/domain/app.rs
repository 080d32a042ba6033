use super::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct App {
    pub(crate) id: ObjectId,
    pub(crate) title: String,
    pub(crate) logo: Option<String>,
    pub(crate) link: Option<String>,
}
