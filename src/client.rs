use std::marker::PhantomData;

use alloy::{
    network::{Ethereum, ReceiptResponse, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, U256},
    providers::Provider,
    rpc::types::TransactionRequest,
    transports::Transport,
};

use crate::{
    bindings::IERC20,
    error::{ReadError, SubmitError},
};

// writes return once the node accepts the tx, mining is seen through receipt_status
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ReadError>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ReadError>;

    async fn approve(
        &self,
        chain_id: u64,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, SubmitError>;

    async fn submit(&self, chain_id: u64, to: Address, data: Bytes)
        -> Result<TxHash, SubmitError>;

    /// `None` until the transaction is mined, then whether it succeeded.
    async fn receipt_status(&self, tx: TxHash) -> Result<Option<bool>, ReadError>;
}

pub struct EvmClient<P, T> {
    provider: P,
    _phantom: PhantomData<T>,
}

impl<P, T> EvmClient<P, T>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            _phantom: PhantomData,
        }
    }

    async fn send(&self, tx: TransactionRequest) -> Result<TxHash, SubmitError> {
        let pending = self.provider.send_transaction(tx).await?;
        Ok(*pending.tx_hash())
    }
}

impl<P, T> ChainClient for EvmClient<P, T>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, ReadError> {
        let token = IERC20::new(token, &self.provider);
        Ok(token.balanceOf(owner).call().await?._0)
    }

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ReadError> {
        let token = IERC20::new(token, &self.provider);
        Ok(token.allowance(owner, spender).call().await?._0)
    }

    async fn approve(
        &self,
        chain_id: u64,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, SubmitError> {
        let token = IERC20::new(token, &self.provider);
        let tx = token
            .approve(spender, amount)
            .into_transaction_request()
            .with_chain_id(chain_id);
        self.send(tx).await
    }

    async fn submit(
        &self,
        chain_id: u64,
        to: Address,
        data: Bytes,
    ) -> Result<TxHash, SubmitError> {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(data)
            .with_chain_id(chain_id);
        self.send(tx).await
    }

    async fn receipt_status(&self, tx: TxHash) -> Result<Option<bool>, ReadError> {
        let receipt = self.provider.get_transaction_receipt(tx).await?;
        Ok(receipt.map(|r| r.status()))
    }
}
