use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::models::{
    AuthUser, FileCategory, FileFilters, ServiceError, ServiceResult, StoredFile,
};
use crate::repositories::{
    FileRepository, FoodItemRepository, RestaurantRepository, UserRepository,
};

/// Service for uploaded files: validation, category directories, metadata,
/// and stamping image URLs back onto the related entity.
pub struct FileService {
    files: Arc<dyn FileRepository>,
    food_items: Arc<dyn FoodItemRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    users: Arc<dyn UserRepository>,
    config: UploadConfig,
}

impl FileService {
    pub fn new(
        files: Arc<dyn FileRepository>,
        food_items: Arc<dyn FoodItemRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        users: Arc<dyn UserRepository>,
        config: UploadConfig,
    ) -> Self {
        Self {
            files,
            food_items,
            restaurants,
            users,
            config,
        }
    }

    /// Store an upload under its category directory with a generated unique
    /// filename, enforcing the size cap and the category's extension
    /// allow-list.
    #[instrument(skip(self, content), fields(filename = %filename, category = %category, caller = %caller.username))]
    pub async fn save_upload(
        &self,
        content: Vec<u8>,
        filename: &str,
        content_type: &str,
        category: FileCategory,
        caller: &AuthUser,
        related_id: Option<String>,
        description: Option<String>,
    ) -> ServiceResult<StoredFile> {
        let size = content.len() as u64;
        if size > self.config.max_file_size {
            warn!("Upload exceeds size cap");
            return Err(ServiceError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }

        let extension = Path::new(filename)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        if !category.allowed_extensions().contains(&extension.as_str()) {
            warn!("Extension not allowed for category");
            return Err(ServiceError::UnsupportedFileType {
                extension,
                category: category.to_string(),
            });
        }

        let unique_filename = format!("{}{}", Uuid::new_v4(), extension);
        let directory = Path::new(&self.config.upload_dir).join(category.directory());
        let path = directory.join(&unique_filename);

        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(crate::models::RepositoryError::from)?;
        tokio::fs::write(&path, &content)
            .await
            .map_err(crate::models::RepositoryError::from)?;

        let record = StoredFile {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            size,
            path: path.to_string_lossy().into_owned(),
            url: format!("/files/{}/{}", category.directory(), unique_filename),
            uploaded_by: caller.id.clone(),
            uploaded_at: Utc::now(),
            category,
            related_id,
            description,
        };
        let created = self.files.create(record).await?;

        info!("File stored with ID: {}", created.id);
        Ok(created)
    }

    /// Upload a food item image and stamp its URL onto the item
    pub async fn upload_food_image(
        &self,
        food_item_id: &str,
        content: Vec<u8>,
        filename: &str,
        content_type: &str,
        caller: &AuthUser,
    ) -> ServiceResult<StoredFile> {
        let mut item = match self.food_items.find_by_id(food_item_id).await? {
            Some(item) => item,
            None => {
                return Err(ServiceError::FoodItemNotFound {
                    id: food_item_id.to_string(),
                })
            }
        };

        let stored = self
            .save_upload(
                content,
                filename,
                content_type,
                FileCategory::FoodImages,
                caller,
                Some(food_item_id.to_string()),
                None,
            )
            .await?;

        item.image_url = Some(stored.url.clone());
        self.food_items.update(item).await?;
        Ok(stored)
    }

    /// Upload a restaurant image and stamp its URL onto the restaurant
    pub async fn upload_restaurant_image(
        &self,
        restaurant_id: &str,
        content: Vec<u8>,
        filename: &str,
        content_type: &str,
        caller: &AuthUser,
    ) -> ServiceResult<StoredFile> {
        let mut restaurant = match self.restaurants.find_by_id(restaurant_id).await? {
            Some(restaurant) => restaurant,
            None => {
                return Err(ServiceError::RestaurantNotFound {
                    id: restaurant_id.to_string(),
                })
            }
        };

        let stored = self
            .save_upload(
                content,
                filename,
                content_type,
                FileCategory::RestaurantImages,
                caller,
                Some(restaurant_id.to_string()),
                None,
            )
            .await?;

        restaurant.image_url = Some(stored.url.clone());
        self.restaurants.update(restaurant).await?;
        Ok(stored)
    }

    /// Upload the caller's profile picture
    pub async fn upload_user_image(
        &self,
        content: Vec<u8>,
        filename: &str,
        content_type: &str,
        caller: &AuthUser,
    ) -> ServiceResult<StoredFile> {
        let stored = self
            .save_upload(
                content,
                filename,
                content_type,
                FileCategory::UserImages,
                caller,
                Some(caller.id.clone()),
                None,
            )
            .await?;

        if let Some(record) = self.users.find_by_id(&caller.id).await? {
            let mut user = record.user;
            user.profile_picture = Some(stored.url.clone());
            self.users.update_profile(user).await?;
        }
        Ok(stored)
    }

    /// Upload a menu image for a restaurant
    pub async fn upload_menu_image(
        &self,
        restaurant_id: &str,
        content: Vec<u8>,
        filename: &str,
        content_type: &str,
        caller: &AuthUser,
    ) -> ServiceResult<StoredFile> {
        if self.restaurants.find_by_id(restaurant_id).await?.is_none() {
            return Err(ServiceError::RestaurantNotFound {
                id: restaurant_id.to_string(),
            });
        }

        self.save_upload(
            content,
            filename,
            content_type,
            FileCategory::MenuImages,
            caller,
            Some(restaurant_id.to_string()),
            None,
        )
        .await
    }

    /// List file metadata. Admins see every record; other callers see only
    /// their own uploads. Filters narrow either view.
    #[instrument(skip(self, filters), fields(caller = %caller.username))]
    pub async fn list_files(
        &self,
        filters: FileFilters,
        caller: &AuthUser,
    ) -> ServiceResult<Vec<StoredFile>> {
        let records = if caller.is_admin() {
            self.files.find_all().await?
        } else {
            self.files.find_by_uploader(&caller.id).await?
        };

        Ok(records
            .into_iter()
            .filter(|file| {
                filters
                    .category
                    .map_or(true, |category| file.category == category)
                    && filters
                        .related_id
                        .as_ref()
                        .map_or(true, |related| file.related_id.as_ref() == Some(related))
            })
            .collect())
    }

    /// Metadata for a single file
    pub async fn get_file(&self, id: &str) -> ServiceResult<StoredFile> {
        match self.files.find_by_id(id).await? {
            Some(file) => Ok(file),
            None => Err(ServiceError::FileNotFound { id: id.to_string() }),
        }
    }

    /// Remove a file. Uploader or admin. Metadata removal is authoritative;
    /// the on-disk blob is deleted best-effort.
    #[instrument(skip(self), fields(id = %id, caller = %caller.username))]
    pub async fn delete_file(&self, id: &str, caller: &AuthUser) -> ServiceResult<()> {
        let file = self.get_file(id).await?;
        if file.uploaded_by != caller.id && !caller.is_admin() {
            return Err(ServiceError::Forbidden);
        }

        self.files.delete(id).await?;

        if let Err(e) = tokio::fs::remove_file(&file.path).await {
            warn!(path = %file.path, error = %e, "Failed to remove file from disk");
        }

        info!("File deleted");
        Ok(())
    }
}
