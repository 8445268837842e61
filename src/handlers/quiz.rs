// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::{
    error::AppError,
    models::{
        category::{Category, CategoryInfo},
        question::{PublicQuestion, QuestionBank},
    },
};

/// Returns the full question bank in order, without option categories.
pub async fn list_questions(
    State(bank): State<Arc<QuestionBank>>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<PublicQuestion> = bank.iter().map(PublicQuestion::from).collect();
    Ok(Json(questions))
}

/// Returns every category with its label and description, in canonical order.
pub async fn list_categories() -> Result<impl IntoResponse, AppError> {
    let categories: Vec<CategoryInfo> = Category::ALL.into_iter().map(CategoryInfo::from).collect();
    Ok(Json(categories))
}
