use alloy::{
    hex,
    primitives::{fixed_bytes, Address, Bytes, FixedBytes, U256},
    sol_types::SolValue,
};

/// Selector of the router's deposit entry point.
pub const DEPOSIT_SELECTOR: FixedBytes<4> = fixed_bytes!("62e4c545");

/// Selector plus four static words.
pub const DEPOSIT_CALL_LEN: usize = 4 + 4 * 32;

/// Arguments of a router deposit: the token moved, who it is moved for, and the vault
/// contract that receives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositCall {
    pub asset: Address,
    pub depositor: Address,
    pub vault: Address,
    pub amount: U256,
}

impl DepositCall {
    /// Calldata for the router: selector, three left-padded addresses, then the amount as
    /// a big-endian word.
    pub fn abi_encode(&self) -> Bytes {
        let params = (self.asset, self.depositor, self.vault, self.amount).abi_encode_params();

        let mut data = Vec::with_capacity(DEPOSIT_CALL_LEN);
        data.extend_from_slice(DEPOSIT_SELECTOR.as_slice());
        data.extend_from_slice(&params);
        data.into()
    }

    pub fn abi_decode(data: &[u8]) -> eyre::Result<Self> {
        eyre::ensure!(
            data.len() == DEPOSIT_CALL_LEN,
            "deposit call must be {DEPOSIT_CALL_LEN} bytes, got {}",
            data.len()
        );
        let (selector, params) = data.split_at(4);
        eyre::ensure!(
            selector == DEPOSIT_SELECTOR.as_slice(),
            "unexpected selector 0x{}",
            hex::encode(selector)
        );

        let (asset, depositor, vault, amount) =
            <(Address, Address, Address, U256)>::abi_decode_params(params, true)?;

        Ok(Self {
            asset,
            depositor,
            vault,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn call(amount: U256) -> DepositCall {
        DepositCall {
            asset: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
            depositor: address!("1111111111111111111111111111111111111111"),
            vault: address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            amount,
        }
    }

    #[test]
    fn encodes_selector_and_padded_words() {
        let c = call(U256::from(990));
        let data = c.abi_encode();

        assert_eq!(data.len(), DEPOSIT_CALL_LEN);
        assert_eq!(&data[..4], &[0x62, 0xe4, 0xc5, 0x45]);

        // each address sits in the low 20 bytes of its word
        for (i, addr) in [c.asset, c.depositor, c.vault].iter().enumerate() {
            let word = &data[4 + i * 32..4 + (i + 1) * 32];
            assert!(word[..12].iter().all(|b| *b == 0));
            assert_eq!(&word[12..], addr.as_slice());
        }

        let amount = &data[4 + 3 * 32..];
        assert!(amount[..30].iter().all(|b| *b == 0));
        assert_eq!(&amount[30..], &[0x03, 0xde]);
    }

    #[test]
    fn encoding_is_deterministic() {
        assert_eq!(call(U256::from(7)).abi_encode(), call(U256::from(7)).abi_encode());
        assert_ne!(call(U256::from(7)).abi_encode(), call(U256::from(8)).abi_encode());
    }

    #[test]
    fn decodes_back_to_arguments() {
        let c = call(U256::MAX);
        let decoded = DepositCall::abi_decode(&c.abi_encode()).unwrap();
        assert_eq!(decoded, c);
    }

    #[test]
    fn rejects_truncated_payload() {
        let data = call(U256::from(1)).abi_encode();
        assert!(DepositCall::abi_decode(&data[..DEPOSIT_CALL_LEN - 1]).is_err());
    }

    #[test]
    fn rejects_foreign_selector() {
        let mut data = call(U256::from(1)).abi_encode().to_vec();
        data[0] = 0xff;
        let err = DepositCall::abi_decode(&data).unwrap_err();
        assert!(err.to_string().contains("unexpected selector"));
    }
}
