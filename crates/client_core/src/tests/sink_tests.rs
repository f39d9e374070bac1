use super::*;

#[tokio::test]
async fn saves_into_a_created_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = DirectorySink::new(temp.path().join("downloads"));

    let path = sink
        .save("offer_letter_Ada_Lovelace.pdf", b"%PDF")
        .await
        .expect("save");

    assert_eq!(path, temp.path().join("downloads/offer_letter_Ada_Lovelace.pdf"));
    assert_eq!(tokio::fs::read(&path).await.expect("read"), b"%PDF");
}

#[tokio::test]
async fn filenames_cannot_escape_the_directory() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = DirectorySink::new(temp.path());

    let path = sink.save("../../evil.zip", b"PK").await.expect("save");
    assert_eq!(path, temp.path().join("evil.zip"));
}
