use super::context::AppContext;
use super::prompts;
use super::ui;
use crate::output::Output;
use crate::AccountCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell};
use owo_colors::OwoColorize;
use pawflix_models::User;

pub async fn run_account(cmd: AccountCommands, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    match cmd {
        AccountCommands::Register { name, username, email } => {
            let name = prompts::value_or_prompt(name, "Name")?;
            let username = prompts::value_or_prompt(username, "Username")?;
            let email = prompts::value_or_prompt(email, "Email")?;
            let password = prompts::prompt_new_password()?;

            let mut accounts = ctx.accounts()?;
            let spinner = ui::spinner("Creating account...");
            let result = accounts.register(&name, &username, &email, &password).await;
            spinner.finish_and_clear();
            let user = result?;

            output.data(&user);
            output.success(format!(
                "Account created! A verification email was sent to {}. Verify it, then sign in.",
                user.email
            ));
            Ok(())
        }
        AccountCommands::Login { email } => {
            let email = prompts::value_or_prompt(email, "Email")?;
            let password = prompts::prompt_password("Password")?;

            let mut accounts = ctx.accounts()?;
            let spinner = ui::spinner("Signing in...");
            let result = accounts.login(&email, &password).await;
            spinner.finish_and_clear();
            let user = result?;

            output.data(&user);
            output.success(format!("Welcome back, {}!", display_name(&user)));
            Ok(())
        }
        AccountCommands::Logout => {
            let mut accounts = ctx.accounts()?;
            if !accounts.is_logged_in() {
                output.info("You are not signed in");
                return Ok(());
            }
            accounts.logout()?;
            output.success("Signed out");
            Ok(())
        }
        AccountCommands::Whoami => {
            match ctx.sessions()?.session() {
                Some(session) => {
                    output.data(&session.user);
                    print_user(&session.user, output);
                }
                None => output.info("You are not signed in"),
            }
            Ok(())
        }
        AccountCommands::Update { name, username, bio } => {
            if name.is_none() && username.is_none() && bio.is_none() {
                output.warn("Nothing to update. Use --name, --username or --bio");
                return Ok(());
            }
            let mut accounts = ctx.accounts()?;
            let user = accounts
                .update_profile(name.as_deref(), username.as_deref(), bio.as_deref())
                .await?;
            output.data(&user);
            output.success("Profile updated");
            print_user(&user, output);
            Ok(())
        }
        AccountCommands::Verify { email } => {
            let mut accounts = ctx.accounts()?;
            match email {
                Some(email) => {
                    let password = prompts::prompt_password("Password")?;
                    accounts.resend_verification_for(&email, &password).await?;
                }
                None => accounts.resend_verification().await?,
            }
            output.success("Verification email sent");
            Ok(())
        }
        AccountCommands::Delete { yes } => {
            let mut accounts = ctx.accounts()?;
            if !accounts.is_logged_in() {
                output.info("You are not signed in");
                return Ok(());
            }
            if !yes
                && !prompts::prompt_yes_no(
                    "Are you sure you want to delete your account? This action cannot be undone.",
                    false,
                )?
            {
                output.info("Cancelled");
                return Ok(());
            }

            let mut lists = ctx.list_store();
            accounts.delete_account(&mut lists).await?;
            output.success("Account deleted");
            Ok(())
        }
    }
}

fn display_name(user: &User) -> &str {
    if user.name.is_empty() {
        &user.email
    } else {
        &user.name
    }
}

fn print_user(user: &User, output: &Output) {
    output.println(ui::header(&format!("[{}] {}", user.initial(), display_name(user))));
    let mut table = ui::new_table();
    let username = if user.username.is_empty() {
        "-".to_string()
    } else {
        format!("@{}", user.username)
    };
    let verified = if user.email_verified {
        "✓ verified".green().to_string()
    } else {
        "✗ not verified".red().to_string()
    };
    table.add_row(vec![Cell::new("Username").add_attribute(Attribute::Bold), Cell::new(username)]);
    table.add_row(vec![Cell::new("Email").add_attribute(Attribute::Bold), Cell::new(&user.email)]);
    table.add_row(vec![Cell::new("Status").add_attribute(Attribute::Bold), Cell::new(verified)]);
    table.add_row(vec![
        Cell::new("Bio").add_attribute(Attribute::Bold),
        Cell::new(user.bio.as_deref().unwrap_or("-")),
    ]);
    output.println(table.to_string());
}
