use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;

use crate::{
    categories::{
        dto::CategoryCreationReq,
        repo::CategoryRepo,
        repo_types::CategoryFields,
    },
    error::ApiError,
};

pub const NAME_MAX_LEN: usize = 50;
pub const PHOTO_PATH_MAX_LEN: usize = 255;

pub(crate) fn is_valid_name(name: &str) -> bool {
    lazy_static! {
        static ref NAME_RE: Regex = Regex::new(r"^[\p{L}\p{N} ]+$").unwrap();
    }
    !name.trim().is_empty() && name.chars().count() <= NAME_MAX_LEN && NAME_RE.is_match(name)
}

pub(crate) fn is_valid_photo_path(url: &str) -> bool {
    lazy_static! {
        static ref URL_RE: Regex = Regex::new(r"^https?://[^\s/$.?#][^\s]*$").unwrap();
    }
    url.len() <= PHOTO_PATH_MAX_LEN && URL_RE.is_match(url)
}

/// Validate the request body and check the requested parent.
/// `id` is the category being updated, if any.
pub async fn validate(
    repo: &dyn CategoryRepo,
    id: Option<Uuid>,
    req: CategoryCreationReq,
) -> Result<CategoryFields, ApiError> {
    let name = req.name.trim().to_string();
    if !is_valid_name(&name) {
        return Err(ApiError::bad_request("Invalid category name"));
    }
    if !is_valid_photo_path(&req.photo_path) {
        return Err(ApiError::bad_request("Invalid photo path"));
    }

    if let Some(parent) = req.parent_category_id {
        if Some(parent) == id {
            return Err(ApiError::bad_request("Category cannot be its own parent"));
        }
        if repo.get(parent).await?.is_none() {
            return Err(ApiError::bad_request("Parent category does not exist"));
        }
        if let Some(id) = id {
            if is_descendant(repo, parent, id).await? {
                return Err(ApiError::bad_request("Category cannot move under its descendant"));
            }
        }
    }

    Ok(CategoryFields {
        name,
        photo_path: req.photo_path,
        parent_category_id: req.parent_category_id,
    })
}

/// Whether `candidate` sits somewhere below `ancestor`.
async fn is_descendant(
    repo: &dyn CategoryRepo,
    candidate: Uuid,
    ancestor: Uuid,
) -> anyhow::Result<bool> {
    let mut seen = HashSet::new();
    let mut current = Some(candidate);
    while let Some(id) = current {
        if id == ancestor {
            return Ok(true);
        }
        if !seen.insert(id) {
            break;
        }
        current = repo.get(id).await?.and_then(|c| c.parent_category_id);
    }
    Ok(false)
}
