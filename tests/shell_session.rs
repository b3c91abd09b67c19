use cryptosim::config::{Config, StorageBackend, StorageEnvConfig};
use cryptosim::interfaces::{App, Command};
use std::path::PathBuf;

fn memory_config() -> Config {
    Config {
        storage: StorageEnvConfig {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("unused"),
        },
        ..Config::default()
    }
}

#[tokio::test]
async fn test_scripted_shell_session() -> anyhow::Result<()> {
    let mut app = App::open(memory_config()).await?;
    app.market()
        .set_price("bitcoin", rust_decimal_macros::dec!(42350.45))
        .await?;

    let script = b"whoami\nlogin ada@example.com secret\nbuy btc 0.1\nbuy btc lots\nportfolio\nhistory\nnonsense\nquit\nwhoami\n";
    let mut out = Vec::new();
    app.run_shell(tokio::io::BufReader::new(&script[..]), &mut out)
        .await?;
    let text = String::from_utf8(out)?;

    assert!(text.contains("Not signed in"));
    assert!(text.contains("Welcome back, ada!"));
    assert!(text.contains("Successfully bought 0.1 BTC\nBalance: $5,764.96"));
    assert!(text.contains("Please enter a valid amount"));
    assert!(text.contains("Total equity:"));
    assert!(text.contains("BUY"));
    assert!(text.contains("unrecognized subcommand"));
    // Nothing after quit is executed
    assert_eq!(text.matches("Not signed in").count(), 1);
    assert_eq!(app.session().balance(), Some(rust_decimal_macros::dec!(5764.955)));
    Ok(())
}

#[tokio::test]
async fn test_chart_and_catalog_commands() -> anyhow::Result<()> {
    let mut app = App::open(memory_config()).await?;

    let catalog = app.execute(Command::Catalog).await?;
    assert!(catalog.contains("Bitcoin"));
    assert!(catalog.contains("Ethereum Classic"));

    let chart = app
        .execute(Command::Chart {
            asset: "sol".to_string(),
            timeframe: "7d".parse()?,
        })
        .await?;
    assert!(chart.starts_with("Solana (SOL) - 7d"));
    // header, summary, 8 points
    assert_eq!(chart.lines().count(), 10);

    let unknown = app
        .execute(Command::Chart {
            asset: "nope".to_string(),
            timeframe: Default::default(),
        })
        .await?;
    assert_eq!(unknown, "Unknown asset: nope");
    Ok(())
}

#[test]
fn test_register_and_logout_round() {
    tokio_test::block_on(async {
        let mut app = App::open(memory_config()).await.unwrap();

        let short = app
            .execute(Command::Register {
                email: "ada@example.com".to_string(),
                password: "123".to_string(),
                name: vec!["Ada".to_string()],
            })
            .await
            .unwrap();
        assert!(short.starts_with("Invalid credentials"));

        let welcome = app
            .execute(Command::Register {
                email: "ada@example.com".to_string(),
                password: "secret".to_string(),
                name: vec!["Ada".to_string(), "Lovelace".to_string()],
            })
            .await
            .unwrap();
        assert!(welcome.starts_with("Welcome, Ada Lovelace!"));

        assert_eq!(app.execute(Command::Logout).await.unwrap(), "Signed out");
        assert_eq!(app.execute(Command::Whoami).await.unwrap(), "Not signed in");
    });
}
