use anyhow::Context;
use revu_api::AppState;
use revu_auth::TokenRegistry;
use revu_config::{HashidConfig, RevuConfig};
use revu_core::hashid::HashidCodec;
use revu_db::service::RevuService;

pub fn load_config() -> anyhow::Result<RevuConfig> {
    RevuConfig::load_with_dotenv().context("failed to load revu configuration")
}

/// Build the hashid codec. Refuses to run without a salt.
pub fn hashid_codec(config: &RevuConfig) -> anyhow::Result<HashidCodec> {
    let hashid = config.require_hashid().context("set hashid.salt (or REVU_HASHID__SALT)")?;
    codec_for(hashid)
}

fn codec_for(hashid: &HashidConfig) -> anyhow::Result<HashidCodec> {
    if hashid.has_custom_alphabet() {
        HashidCodec::with_alphabet(&hashid.alphabet, &hashid.salt, hashid.min_length)
            .context("invalid hashid.alphabet")
    } else {
        Ok(HashidCodec::new(&hashid.salt, hashid.min_length))
    }
}

pub async fn open_service(path: &str) -> anyhow::Result<RevuService> {
    RevuService::new_local(path)
        .await
        .with_context(|| format!("failed to open database at {path}"))
}

pub fn app_state(config: &RevuConfig, service: RevuService) -> anyhow::Result<AppState> {
    let hashids = hashid_codec(config)?;
    let tokens = TokenRegistry::from_config(&config.auth);
    if tokens.is_empty() {
        tracing::warn!("no auth.tokens configured; every request will be rejected with 401");
    }
    Ok(AppState::new(service, hashids, tokens, config.pagination.clone()))
}
