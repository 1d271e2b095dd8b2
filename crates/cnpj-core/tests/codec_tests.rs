//! Codec and branch resolution through the public API

use cnpj_core::{branch, cnpj, confirm, decide_before_query, decide_final, Cnpj, Error};
use pretty_assertions::assert_eq;

#[test]
fn test_known_identifiers() {
    assert_eq!(cnpj::normalize("123456789012"), "00123456789012");
    assert_eq!(cnpj::normalize("12345678901234"), "12345678901234");
    assert!(cnpj::is_valid_checksum("54550752000155"));
    assert!(cnpj::is_valid_checksum("11.222.333/0001-81"));
    assert!(!cnpj::is_valid_checksum("11111111111111"));
    assert!(!cnpj::is_valid_checksum("12345678901235"));
    assert_eq!(cnpj::format("54550752000155"), "54.550.752/0001-55");
    assert!(cnpj::is_empty_like("000.000.000/0000-00"));
    assert!(!cnpj::is_empty_like("54.550.752/0001-55"));
}

#[test]
fn test_every_degenerate_sequence_rejected() {
    for d in '0'..='9' {
        let id: String = std::iter::repeat(d).take(14).collect();
        assert!(!cnpj::is_valid_checksum(&id), "{} accepted", id);
    }
}

#[test]
fn test_ensure_valid_error_message() {
    let err = cnpj::ensure_valid("12.345.678/9012-35").unwrap_err();
    assert_eq!(err, Error::InvalidIdentifier("12345678901235".into()));
    assert_eq!(err.to_string(), "invalid CNPJ: 12345678901235");
}

#[test]
fn test_headquarters_of_every_branch_is_valid() {
    let root = "11222333";
    for order in 2..=20u32 {
        let body = format!("{}{:04}", root, order);
        let (a, b) = cnpj::check_digits(&body).unwrap();
        let branch_id = format!("{}{}{}", body, a, b);
        assert!(branch::is_branch(&branch_id));

        let hq = branch::to_headquarters_id(&branch_id);
        assert_eq!(hq, "11222333000181");
        assert!(Cnpj::parse(&hq).is_ok());
    }
}

#[tokio::test]
async fn test_resolver_with_channel_confirmer() {
    let (confirmer, mut requests) = confirm::channel(4);
    tokio::spawn(async move {
        while let Some(request) = requests.recv().await {
            let accept = request.branch.ends_with("36");
            request.respond(accept);
        }
    });

    let hq = decide_final("", "54.550.752/0002-36", |h, b| confirmer.confirm(h, b))
        .await
        .unwrap();
    assert_eq!(hq, "54550752000155");

    let kept = decide_before_query("11.222.333/0002-62", |h, b| confirmer.confirm(h, b))
        .await
        .unwrap();
    assert_eq!(kept, "11222333000262");
}
