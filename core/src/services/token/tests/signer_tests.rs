//! Unit tests for ES512 token minting

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::domain::entities::token::{Claims, Header};
use crate::services::token::{Es512KeyManager, TokenServiceConfig, TokenSigner, SIGNATURE_LEN};

fn signer() -> TokenSigner {
    let keys = Es512KeyManager::generate();
    TokenSigner::new(&keys, TokenServiceConfig::new("auth-svc", "auth-svc"))
}

fn sample_claims() -> Claims {
    Claims::new_service_token(
        "auth-svc",
        "client-1",
        vec!["svc-a".to_string()],
        "r:svc-a:*",
    )
}

#[test]
fn test_mint_produces_three_segments() {
    let token = signer().mint(&sample_claims()).unwrap();

    let segments: Vec<&str> = token.compact.split('.').collect();
    assert_eq!(segments.len(), 3);
}

#[test]
fn test_signature_has_fixed_width() {
    let token = signer().mint(&sample_claims()).unwrap();

    assert_eq!(token.signature.len(), SIGNATURE_LEN);

    let decoded = URL_SAFE_NO_PAD
        .decode(token.compact.split('.').nth(2).unwrap())
        .unwrap();
    assert_eq!(decoded, token.signature);
}

#[test]
fn test_compact_segments_decode_to_signed_content() {
    let claims = sample_claims();
    let token = signer().mint(&claims).unwrap();
    let segments: Vec<&str> = token.compact.split('.').collect();

    let header: Header =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[0]).unwrap()).unwrap();
    let decoded: Claims =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();

    assert_eq!(header, Header::es512());
    assert_eq!(decoded, claims);
}

#[test]
fn test_mint_service_token_applies_config() {
    let keys = Es512KeyManager::generate();
    let config = TokenServiceConfig::new("auth-svc", "auth-svc").with_token_ttl_secs(60);
    let signer = TokenSigner::new(&keys, config);

    let compact = signer
        .mint_service_token("client-1", vec!["svc-a".to_string()], "r:svc-a:*")
        .unwrap();

    let segments: Vec<&str> = compact.split('.').collect();
    let claims: Claims =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segments[1]).unwrap()).unwrap();

    assert_eq!(claims.iss, "auth-svc");
    assert_eq!(claims.exp, claims.iat + 60);
}
