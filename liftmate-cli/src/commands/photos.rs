use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use liftmate::models::PhotoCategory;
use liftmate::services::PhotoService;

use super::AppContext;
use crate::ui::display;

fn service(ctx: &AppContext) -> Result<PhotoService<'_>> {
    Ok(PhotoService::new(&ctx.storage, ctx.config.photos_dir()?))
}

pub fn list_photos(ctx: &AppContext, category: Option<&str>) -> Result<()> {
    let category = category.map(str::parse::<PhotoCategory>).transpose()?;
    let photos = service(ctx)?.list_photos(category)?;

    display::heading("Progress Photos");
    if photos.is_empty() {
        println!("No photos found");
        return Ok(());
    }

    for photo in photos {
        println!(
            "{}  {:<6} {}",
            display::format_date(photo.taken_at, &ctx.config.ui.date_format).dimmed(),
            photo.category,
            photo.image_path.display()
        );
        if let Some(notes) = photo.notes {
            println!("    {}", notes);
        }
        println!("    {}", photo.id.dimmed());
    }

    Ok(())
}

pub fn add_photo(ctx: &AppContext, path: &Path, category: &str, notes: Option<String>) -> Result<()> {
    let category: PhotoCategory = category.parse()?;
    let photo = service(ctx)?.add_photo(path, category, notes)?;

    println!("✓ Saved {} photo to {}", photo.category, photo.image_path.display());
    println!("    {}", photo.id.dimmed());
    Ok(())
}

pub fn delete_photo(ctx: &AppContext, id: &str) -> Result<()> {
    if !service(ctx)?.delete_photo(id)? {
        anyhow::bail!("Photo {} not found", id);
    }

    println!("✓ Photo deleted");
    Ok(())
}

pub fn compare_photos(ctx: &AppContext, category: &str) -> Result<()> {
    let category: PhotoCategory = category.parse()?;
    let date_format = &ctx.config.ui.date_format;

    let Some(comparison) = service(ctx)?.compare(category)? else {
        println!("Need at least two {} photos to compare", category);
        return Ok(());
    };

    display::heading(&format!("{} progress", category));
    println!(
        "Before: {}  {}",
        display::format_date(comparison.before.taken_at, date_format),
        comparison.before.image_path.display()
    );
    println!(
        "After:  {}  {}",
        display::format_date(comparison.after.taken_at, date_format),
        comparison.after.image_path.display()
    );
    println!("{} days apart", comparison.days_between().to_string().cyan());
    Ok(())
}
