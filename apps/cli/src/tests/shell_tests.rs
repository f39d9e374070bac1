use super::*;

#[test]
fn parses_navigation_and_actions() {
    assert_eq!(parse_command("next"), Ok(Command::Next));
    assert_eq!(parse_command("  prev "), Ok(Command::Previous));
    assert_eq!(parse_command("page 3"), Ok(Command::Page(3)));
    assert_eq!(parse_command("generate 4"), Ok(Command::Generate(4)));
    assert_eq!(parse_command("NOTIFY 10"), Ok(Command::Notify(10)));
    assert_eq!(parse_command("notify-all"), Ok(Command::NotifyAll));
    assert_eq!(parse_command("gen-all"), Ok(Command::GenerateAll));
    assert_eq!(
        parse_command("upload data/students 2026.xlsx"),
        Ok(Command::Upload(PathBuf::from("data/students 2026.xlsx")))
    );
    assert_eq!(
        parse_command("date October 16, 2026"),
        Ok(Command::Date("October 16, 2026".into()))
    );
}

#[test]
fn rejects_bad_rows_and_unknown_verbs() {
    assert!(parse_command("generate 0").is_err());
    assert!(parse_command("notify x").is_err());
    assert!(parse_command("page").is_err());
    assert!(parse_command("upload").is_err());
    assert_eq!(
        parse_command("launch"),
        Err("unknown command 'launch' (try 'help')".into())
    );
    assert_eq!(parse_command("   "), Err(String::new()));
}

#[tokio::test]
async fn read_upload_uses_the_file_name_and_offer_date() {
    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("students.csv");
    tokio::fs::write(&path, b"Student Name\n").await.expect("write");

    let file = read_upload(&path, "October 16, 2026").await.expect("read");
    assert_eq!(file.filename, "students.csv");
    assert_eq!(file.bytes, b"Student Name\n");
    assert_eq!(file.offer_date.as_deref(), Some("October 16, 2026"));

    assert!(read_upload(&temp.path().join("missing.csv"), "x")
        .await
        .is_err());
}
