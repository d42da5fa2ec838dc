use std::{fs, path::PathBuf, str::FromStr, sync::Arc};

use attendance_api::services::auth::codec::{decoding_key_from_pem, encoding_key_from_pem};
use attendance_api::services::auth::{
    Claims, KeyStore, Role, StaticKeyLookup, TokenCodec, TokenType,
};
use clap::Parser;

/// Mint a signed token for local development and key-rotation drills.
///
/// - Signs with the given private key PEM under `--kid`
/// - Optionally verifies the result with the matching public key PEM
/// - Outputs the token, and (unless --quiet) the decoded claims
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Signing algorithm (RS256, PS256, ES256, EdDSA, ...)
    #[arg(long, default_value = "RS256")]
    algorithm: String,

    /// Key id written to the token header
    #[arg(long)]
    kid: String,

    /// Path to the signing private key in PEM
    #[arg(long, value_name = "FILE")]
    private_pem: PathBuf,

    /// Path to the public key in PEM. If provided, the token is verified before printing.
    #[arg(long, value_name = "FILE")]
    public_pem: Option<PathBuf>,

    #[arg(long)]
    user_id: i64,

    #[arg(long)]
    employee_id: Option<String>,

    /// EMPLOYEE, ADMIN, QRCODE or DASHBOARD
    #[arg(long, default_value = "EMPLOYEE")]
    role: String,

    /// Mint a refresh token instead of an access token
    #[arg(long, default_value_t = false)]
    refresh: bool,

    /// Lifetime in seconds
    #[arg(long, default_value_t = 3600)]
    ttl: i64,

    /// Override iat (unix seconds). Default: now.
    #[arg(long)]
    iat: Option<i64>,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let algorithm = jsonwebtoken::Algorithm::from_str(&args.algorithm)?;
    let role = Role::from_str(&args.role)?;
    let token_type = if args.refresh {
        TokenType::Refresh
    } else {
        TokenType::Access
    };

    let private_pem = fs::read_to_string(&args.private_pem)?;
    let keys = KeyStore::with_keys([(
        args.kid.clone(),
        encoding_key_from_pem(algorithm, &private_pem)?,
    )]);

    let mut lookup = StaticKeyLookup::new();
    if let Some(path) = &args.public_pem {
        let public_pem = fs::read_to_string(path)?;
        let public_key = decoding_key_from_pem(algorithm, &public_pem)?;
        lookup = lookup.with_key(args.kid.clone(), public_key);
    }
    let verify = !lookup.is_empty();

    let codec = TokenCodec::new(&args.algorithm, Arc::new(lookup), Arc::new(keys))?;

    let mut claims = Claims::new(args.user_id, role, token_type, args.ttl);
    if let Some(employee_id) = args.employee_id {
        claims = claims.with_employee_id(employee_id);
    }
    if let Some(iat) = args.iat {
        claims = claims.with_issued_at(iat);
    }

    let token = codec.generate_token(&args.kid, &claims)?;

    if verify {
        codec.validate_token(&token)?;
    }

    if args.quiet {
        println!("{}", token);
        return Ok(());
    }

    println!("token: {}", token);
    println!("kid: {}", args.kid);
    println!("claims: {}", serde_json::to_string_pretty(&claims)?);
    if let Some(exp) = claims.expires_at() {
        println!("expires_at: {}", exp.to_rfc3339());
    }
    println!("verified: {}", if verify { "yes" } else { "(no public key)" });

    Ok(())
}
