use axum::extract::Multipart;
use skillswap_core::blob::PhotoUpload;
use skillswap_core::profile::parse_skills;
use skillswap_core::{GraphError, ProfileUpdate};
use tracing::debug;

use crate::error::AppError;

/// Field carrying the photo; `file` is accepted as well.
pub const PHOTO_FIELD: &str = "profilePhoto";

/// The multipart profile form: text fields plus an optional photo.
///
/// Skills arrive as JSON arrays in text fields, e.g. `skillsOffered=["Guitar"]`.
#[derive(Debug, Default)]
pub struct ProfileForm {
    pub update: ProfileUpdate,
    pub photo: Option<PhotoUpload>,
}

impl ProfileForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = ProfileForm::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == PHOTO_FIELD || name == "file" {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                if !bytes.is_empty() {
                    form.photo = Some(PhotoUpload {
                        bytes: bytes.to_vec(),
                        file_name,
                        content_type,
                    });
                }
                continue;
            }

            let value = field.text().await.map_err(malformed)?;
            let update = &mut form.update;
            match name.as_str() {
                "name" => update.name = Some(value),
                "location" => update.location = Some(value),
                "availability" => update.availability = Some(value),
                "profileVisibility" => {
                    update.visibility = Some(value.parse().map_err(GraphError::ValidationFailed)?)
                }
                "skillsOffered" => update.skills_offered = Some(skills(&value)?),
                "skillsWanted" => update.skills_wanted = Some(skills(&value)?),
                other => debug!("Ignoring form field '{other}'"),
            }
        }

        Ok(form)
    }
}

fn skills(raw: &str) -> Result<Vec<String>, GraphError> {
    parse_skills(raw).map_err(|_| GraphError::validation("Invalid skills format"))
}

fn malformed(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::MalformedPayload(e.body_text())
}
