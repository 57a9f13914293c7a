use anyhow::Result;
use colored::Colorize;

use liftmate::models::WeightUnit;

use super::AppContext;
use crate::ui::display;

pub fn show_settings(ctx: &AppContext) -> Result<()> {
    let settings = ctx.storage.get_settings()?;

    display::heading("Settings");
    println!("Weight unit: {}", settings.weight_unit.to_string().cyan());
    println!("Theme:       {}", settings.theme);
    println!("Dark mode:   {}", settings.dark_mode);
    Ok(())
}

pub fn set_unit(ctx: &AppContext, unit: &str) -> Result<()> {
    let unit: WeightUnit = unit.parse()?;

    let mut settings = ctx.storage.get_settings()?;
    settings.weight_unit = unit;
    ctx.storage.save_settings(&settings)?;

    println!("✓ Weight unit set to {}", unit);
    Ok(())
}

pub fn show_profile(ctx: &AppContext) -> Result<()> {
    let profile = ctx.storage.get_profile()?;

    display::heading("Profile");
    println!("Name:   {}", profile.name.bold());
    if !profile.sex.is_empty() {
        println!("Sex:    {}", profile.sex);
    }
    if profile.age > 0 {
        println!("Age:    {}", profile.age);
    }
    println!(
        "Joined: {}",
        display::format_date(profile.join_date, &ctx.config.ui.date_format)
    );
    println!("Workouts logged: {}", ctx.storage.list_workouts()?.len());
    Ok(())
}

pub fn set_profile(
    ctx: &AppContext,
    name: Option<String>,
    sex: Option<String>,
    age: Option<u32>,
) -> Result<()> {
    let mut profile = ctx.storage.get_profile()?;

    if let Some(name) = name {
        if name.trim().is_empty() {
            anyhow::bail!("Name cannot be empty");
        }
        profile.name = name.trim().to_string();
    }
    if let Some(sex) = sex {
        profile.sex = sex;
    }
    if let Some(age) = age {
        profile.age = age;
    }

    ctx.storage.save_profile(&profile)?;
    println!("✓ Profile updated");
    Ok(())
}
