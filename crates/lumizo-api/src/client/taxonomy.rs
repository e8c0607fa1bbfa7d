//! Categories, brands and tags.

use std::path::Path;

use lumizo_core::{Brand, BrandInput, Category, CategoryInput, Tag, TagInput};
use reqwest::multipart::Form;
use reqwest::Method;

use super::LumizoClient;
use crate::error::ApiError;
use crate::types::{CategoryNode, EntityResponse, ListResponse};

impl LumizoClient {
    /// # Errors
    ///
    /// Propagates HTTP, status and decoding errors.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response: ListResponse<Category> = self
            .get_json(self.endpoint(&["categories"]), "categories")
            .await?;
        Ok(response.into_vec())
    }

    /// Top-level categories only (`GET /categories/parents`).
    ///
    /// # Errors
    ///
    /// Propagates HTTP, status and decoding errors.
    pub async fn parent_categories(&self) -> Result<Vec<Category>, ApiError> {
        let response: ListResponse<Category> = self
            .get_json(self.endpoint(&["categories", "parents"]), "parent categories")
            .await?;
        Ok(response.into_vec())
    }

    /// # Errors
    ///
    /// Propagates HTTP, status and decoding errors.
    pub async fn subcategories(&self, parent_id: &str) -> Result<Vec<Category>, ApiError> {
        let url = self.endpoint(&["categories", parent_id, "subcategories"]);
        let response: ListResponse<Category> = self
            .get_json(url, &format!("subcategories of {parent_id}"))
            .await?;
        Ok(response.into_vec())
    }

    /// # Errors
    ///
    /// Propagates HTTP, status and decoding errors.
    pub async fn category_tree(&self) -> Result<Vec<CategoryNode>, ApiError> {
        let response: ListResponse<CategoryNode> = self
            .get_json(self.endpoint(&["categories", "tree"]), "category tree")
            .await?;
        Ok(response.into_vec())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn get_category(&self, id: &str) -> Result<Category, ApiError> {
        let response: EntityResponse<Category> = self
            .get_json(self.endpoint(&["categories", id]), &format!("category {id}"))
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::UnexpectedStatus`] when the backend rejects the input.
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        let response: EntityResponse<Category> = self
            .send_json(Method::POST, self.endpoint(&["categories"]), input, "created category")
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] or [`ApiError::UnexpectedStatus`].
    pub async fn update_category(
        &self,
        id: &str,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let response: EntityResponse<Category> = self
            .send_json(
                Method::PUT,
                self.endpoint(&["categories", id]),
                input,
                &format!("updated category {id}"),
            )
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn delete_category(&self, id: &str) -> Result<(), ApiError> {
        self.delete(self.endpoint(&["categories", id])).await
    }

    /// # Errors
    ///
    /// Propagates HTTP, status and decoding errors.
    pub async fn list_brands(&self) -> Result<Vec<Brand>, ApiError> {
        let response: ListResponse<Brand> =
            self.get_json(self.endpoint(&["brands"]), "brands").await?;
        Ok(response.into_vec())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn get_brand(&self, id: &str) -> Result<Brand, ApiError> {
        let response: EntityResponse<Brand> = self
            .get_json(self.endpoint(&["brands", id]), &format!("brand {id}"))
            .await?;
        Ok(response.into_inner())
    }

    /// Creates a brand. With `logo` the request is multipart and the file is
    /// sent as the `image` part; otherwise it is plain JSON.
    ///
    /// # Errors
    ///
    /// [`ApiError::Io`] if `logo` cannot be read, or
    /// [`ApiError::UnexpectedStatus`] when the backend rejects the input.
    pub async fn create_brand(
        &self,
        input: &BrandInput,
        logo: Option<&Path>,
    ) -> Result<Brand, ApiError> {
        let url = self.endpoint(&["brands"]);
        let response: EntityResponse<Brand> = match logo {
            Some(path) => {
                let form = brand_form(input, path).await?;
                self.send_multipart(Method::POST, url, form, "created brand")
                    .await?
            }
            None => {
                self.send_json(Method::POST, url, input, "created brand")
                    .await?
            }
        };
        Ok(response.into_inner())
    }

    /// Updates a brand; `logo` behaves as in [`Self::create_brand`].
    ///
    /// # Errors
    ///
    /// [`ApiError::Io`], [`ApiError::NotFound`] or [`ApiError::UnexpectedStatus`].
    pub async fn update_brand(
        &self,
        id: &str,
        input: &BrandInput,
        logo: Option<&Path>,
    ) -> Result<Brand, ApiError> {
        let url = self.endpoint(&["brands", id]);
        let context = format!("updated brand {id}");
        let response: EntityResponse<Brand> = match logo {
            Some(path) => {
                let form = brand_form(input, path).await?;
                self.send_multipart(Method::PUT, url, form, &context).await?
            }
            None => self.send_json(Method::PUT, url, input, &context).await?,
        };
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn delete_brand(&self, id: &str) -> Result<(), ApiError> {
        self.delete(self.endpoint(&["brands", id])).await
    }

    /// # Errors
    ///
    /// Propagates HTTP, status and decoding errors.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let response: ListResponse<Tag> = self.get_json(self.endpoint(&["tags"]), "tags").await?;
        Ok(response.into_vec())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn get_tag(&self, id: &str) -> Result<Tag, ApiError> {
        let response: EntityResponse<Tag> = self
            .get_json(self.endpoint(&["tags", id]), &format!("tag {id}"))
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::UnexpectedStatus`] when the backend rejects the input.
    pub async fn create_tag(&self, input: &TagInput) -> Result<Tag, ApiError> {
        let response: EntityResponse<Tag> = self
            .send_json(Method::POST, self.endpoint(&["tags"]), input, "created tag")
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] or [`ApiError::UnexpectedStatus`].
    pub async fn update_tag(&self, id: &str, input: &TagInput) -> Result<Tag, ApiError> {
        let response: EntityResponse<Tag> = self
            .send_json(
                Method::PUT,
                self.endpoint(&["tags", id]),
                input,
                &format!("updated tag {id}"),
            )
            .await?;
        Ok(response.into_inner())
    }

    /// # Errors
    ///
    /// [`ApiError::NotFound`] for an unknown id.
    pub async fn delete_tag(&self, id: &str) -> Result<(), ApiError> {
        self.delete(self.endpoint(&["tags", id])).await
    }
}

async fn brand_form(input: &BrandInput, logo: &Path) -> Result<Form, ApiError> {
    let mut form = Form::new();
    if let Some(name) = &input.name {
        form = form.text("name", name.clone());
    }
    Ok(form.part("image", super::uploads::file_part(logo).await?))
}
