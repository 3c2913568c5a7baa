use std::{fmt, str::FromStr};

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};
use eyre::WrapErr;

/// The depositing account. The key only ever lives in memory.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
}

impl Account {
    /// Reads the key from the terminal without echoing it.
    pub fn prompt() -> eyre::Result<Self> {
        let key = rpassword::prompt_password("Enter your Private Key: ")
            .wrap_err("read private key")?;
        Self::from_hex(&key)
    }

    /// Accepts the key with or without a `0x` prefix.
    pub fn from_hex(key: &str) -> eyre::Result<Self> {
        // the parse error is dropped so the key never reaches a log line
        let signer =
            PrivateKeySigner::from_str(key.trim()).map_err(|_| eyre::eyre!("malformed private key"))?;
        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
