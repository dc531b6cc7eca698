use anyhow::{bail, Context, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

use tracker_core::time::parse_date;
use tracker_core::UserProfile;
use tracker_store::write_user_info;

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> Result<Option<String>> {
    write!(out, "{}: ", label)?;
    out.flush().ok();
    let mut s = String::new();
    if input.read_line(&mut s)? == 0 {
        return Ok(None);
    }
    Ok(Some(s.trim().to_string()))
}

/// Ask for the profile fields. Date of birth is asked again until it parses.
pub fn read_profile<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<UserProfile> {
    let username = prompt(input, out, "username")?.unwrap_or_default();
    if username.is_empty() {
        bail!("username is required");
    }

    let resting = prompt(input, out, "resting heart rate")?.unwrap_or_default();
    let resting_heart_rate = if resting.is_empty() {
        0.0
    } else {
        resting
            .parse::<f64>()
            .with_context(|| format!("invalid heart rate '{resting}'"))?
    };

    let date_of_birth = loop {
        let Some(line) = prompt(input, out, "date of birth (YYYY-MM-DD)")? else {
            bail!("no date of birth given");
        };
        match parse_date(&line) {
            Ok(d) => break d,
            Err(e) => writeln!(out, "  {e}")?,
        }
    };

    Ok(UserProfile::new(username, resting_heart_rate, date_of_birth))
}

pub fn run_init_user(data_dir: &Path) -> Result<()> {
    println!("Tracker user setup\n");
    let stdin = io::stdin();
    let profile = read_profile(&mut stdin.lock(), &mut io::stdout())?;

    let path = write_user_info(data_dir, &profile)?;
    tracing::info!(user = %profile.username, path = %path.display(), "wrote user profile");

    println!("\nWrote {}", path.display());
    println!("\nNext:");
    println!("- tracker add --user {} --duration 30m --effort 0.6 --description \"walk\"", profile.username);
    println!("- tracker show --user {}", profile.username);
    Ok(())
}
