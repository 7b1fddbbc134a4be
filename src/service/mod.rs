use crate::{
    dto::{
        CategoryResponse, CreateCategoryRequest, CreateNoteRequest, NoteResponse,
        UpdateNoteRequest,
    },
    error::ServiceError,
    repository::Repository,
};

use std::sync::Arc;

#[derive(Clone)]
pub struct NoteService {
    repo: Arc<Repository>,
}

impl NoteService {
    pub const fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        if request.title.trim().is_empty() || request.content.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Title and content are required".to_string(),
            ));
        }

        self.repo
            .create_note(&request.title, &request.content, request.category_id)
            .await
            .map(NoteResponse::from)
            .map_err(Into::into)
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        // A supplied-but-blank title or content counts as not supplied; an
        // explicit `categoryId: null` is a real instruction to detach.
        let title = request.title.filter(|t| !t.trim().is_empty());
        let content = request.content.filter(|c| !c.trim().is_empty());

        if title.is_none() && content.is_none() && request.category_id.is_none() {
            return Err(ServiceError::Validation(
                "At least one field must be provided".to_string(),
            ));
        }

        self.repo
            .update_note(id, title.as_deref(), content.as_deref(), request.category_id)
            .await?
            .map(NoteResponse::from)
            .ok_or_else(|| ServiceError::NotFound("Note not found".to_string()))
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ServiceError> {
        if self.repo.delete_note(id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Note not found".to_string()))
        }
    }

    pub async fn get_one_note(&self, id: i64) -> Result<NoteResponse, ServiceError> {
        self.repo
            .get_one_note(id)
            .await?
            .map(NoteResponse::from)
            .ok_or_else(|| ServiceError::NotFound("Note not found".to_string()))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ServiceError> {
        self.repo
            .get_all_notes()
            .await
            .map(|notes| notes.into_iter().map(NoteResponse::from).collect())
            .map_err(Into::into)
    }

    pub async fn create_category(
        &self,
        request: CreateCategoryRequest,
    ) -> Result<CategoryResponse, ServiceError> {
        if request.name.trim().is_empty() {
            return Err(ServiceError::Validation(
                "Category name is required".to_string(),
            ));
        }

        self.repo
            .create_category(&request.name)
            .await
            .map(CategoryResponse::from)
            .map_err(Into::into)
    }

    pub async fn get_all_categories(&self) -> Result<Vec<CategoryResponse>, ServiceError> {
        self.repo
            .get_all_categories()
            .await
            .map(|categories| categories.into_iter().map(CategoryResponse::from).collect())
            .map_err(Into::into)
    }
}
