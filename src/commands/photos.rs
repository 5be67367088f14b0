use clap::{Args, Subcommand};
use chrono::NaiveDate;
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

use crate::commands::OutputFormat;
use crate::models::PhotoQuery;
use crate::sync::SyncCoordinator;

#[derive(Args)]
pub struct PhotosCommand {
    #[command(subcommand)]
    pub command: PhotosSubcommand,
}

#[derive(Subcommand)]
pub enum PhotosSubcommand {
    /// List progress photos, newest first
    List {
        /// Only include photos on or after this date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Only include photos on or before this date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Filter by tag (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Maximum number of rows
        #[arg(long)]
        limit: Option<u32>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Upload a progress photo
    Upload {
        /// Path to an image file
        file: PathBuf,

        /// Date the photo was taken (YYYY-MM-DD); EXIF or today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Tag for the photo (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a progress photo
    Delete {
        /// Photo ID (UUID)
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl PhotosCommand {
    pub async fn run(
        &self,
        coordinator: &SyncCoordinator,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PhotosSubcommand::List {
                start_date,
                end_date,
                tags,
                limit,
                format,
            } => {
                let mut query = PhotoQuery::new();
                if let Some(date) = start_date {
                    query = query.with_start_date(*date);
                }
                if let Some(date) = end_date {
                    query = query.with_end_date(*date);
                }
                if !tags.is_empty() {
                    query = query.with_tags(tags.clone());
                }
                if let Some(limit) = limit {
                    query = query.with_limit(*limit);
                }

                let photos = coordinator.load_photos(&query).await?;
                if photos.is_empty() {
                    println!("No photos found");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&photos)?);
                    }
                    OutputFormat::Text => {
                        println!("{:<36}  {:<19}  {:>9}  TAGS", "ID", "DATE", "SIZE");
                        println!("{}", "-".repeat(78));
                        for photo in &photos {
                            println!(
                                "{:<36}  {:<19}  {:>9}  {}",
                                photo.id,
                                photo.date.format("%Y-%m-%d %H:%M:%S"),
                                format_size(photo.file_size),
                                photo.tags.join(", "),
                            );
                        }
                        println!("\nTotal: {} photo(s)", photos.len());
                    }
                }
                Ok(())
            }

            PhotosSubcommand::Upload {
                file,
                date,
                tags,
                format,
            } => {
                let extension = file
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase())
                    .unwrap_or_default();
                if !matches!(
                    extension.as_str(),
                    "jpg" | "jpeg" | "png" | "bmp" | "tif" | "tiff"
                ) {
                    return Err("Only image files can be uploaded".into());
                }

                let filename = file
                    .file_name()
                    .and_then(|n| n.to_str())
                    .ok_or("Invalid file name")?
                    .to_string();
                let data = std::fs::read(file)?;

                let photo = coordinator
                    .upload_photo(&filename, data, *date, tags)
                    .await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&photo)?);
                    }
                    OutputFormat::Text => {
                        println!("Uploaded photo: {}", photo.id);
                        println!("  Date: {}", photo.date.format("%Y-%m-%d"));
                        if !photo.tags.is_empty() {
                            println!("  Tags: {}", photo.tags.join(", "));
                        }
                    }
                }
                Ok(())
            }

            PhotosSubcommand::Delete { id, force } => {
                // Confirm deletion unless --force is used
                if !force {
                    print!("Delete photo {}? [y/N] ", id);
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;

                    if !input.trim().eq_ignore_ascii_case("y") {
                        println!("Deletion cancelled.");
                        return Ok(());
                    }
                }

                if coordinator.delete_photo(*id).await? {
                    println!("Deleted photo: {}", id);
                } else {
                    println!("Photo {} was not on the server; removed locally.", id);
                }
                Ok(())
            }
        }
    }
}

/// Renders a byte count the way the photo grid does (KB/MB, one decimal).
fn format_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    }
}
