pub mod formatting;
pub mod repo_list;
