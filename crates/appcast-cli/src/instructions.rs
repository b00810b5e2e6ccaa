//! Text handed to the operator after key generation.

use zeroize::Zeroizing;

/// Security reminders printed after key generation.
pub const SECURITY_NOTES: [&str; 4] = [
    "Keep the private key secure and never commit it to version control",
    "The private key is used to sign releases; treat it like a password",
    "The public key should be embedded in your app for signature verification",
    "Consider using different keys for development and production",
];

/// The `Info.plist` entry that embeds the public key.
#[must_use]
pub fn plist_snippet(public_key: &str) -> String {
    format!(
        "<!-- Add this to your app's Info.plist -->\n<key>SUPublicEDKey</key>\n<string>{public_key}</string>\n"
    )
}

/// Setup guide for storing the private key as a CI secret.
///
/// The guide embeds the private key, so it is returned zeroizing.
#[must_use]
pub fn setup_guide(secret_env: &str, private_key: &str) -> Zeroizing<String> {
    Zeroizing::new(format!(
        "# GitHub Secrets Setup Instructions

1. Go to your repository on GitHub
2. Navigate to Settings > Secrets and variables > Actions
3. Click \"New repository secret\"
4. Name: {secret_env}
5. Value: {private_key}
6. Click \"Add secret\"

This private key will be used to sign your release assets automatically.
Delete this file once the secret is stored.
"
    ))
}
