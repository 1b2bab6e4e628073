// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! ERC20 calls needed around a burn: balance, allowance and approval of the
//! TokenMessenger.

use alloy_primitives::{Address, U256};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::{sol, SolCall};
use tracing::{debug, info};

use crate::error::Result;
use Erc20::{allowanceCall, approveCall, balanceOfCall};

sol! {
    interface Erc20 {
        function balanceOf(address account) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Erc20Contract {
    address: Address,
}

impl Erc20Contract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn balance_of_call(&self, account: Address) -> TransactionRequest {
        self.request(balanceOfCall { account }.abi_encode())
    }

    pub fn allowance_call(&self, owner: Address, spender: Address) -> TransactionRequest {
        debug!(
            token_address = %self.address,
            owner = %owner,
            spender = %spender,
            event = "allowance_call_created"
        );
        self.request(allowanceCall { owner, spender }.abi_encode())
    }

    pub fn approve_transaction(
        &self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> TransactionRequest {
        info!(
            token_address = %self.address,
            owner = %owner,
            spender = %spender,
            amount = %amount,
            event = "approve_transaction_created"
        );
        self.request(approveCall { spender, amount }.abi_encode())
            .from(owner)
    }

    /// Decodes a `balanceOf` or `allowance` result.
    pub fn decode_amount(output: &[u8]) -> Result<U256> {
        Ok(balanceOfCall::abi_decode_returns(output)?)
    }

    fn request(&self, calldata: Vec<u8>) -> TransactionRequest {
        TransactionRequest::default()
            .to(self.address)
            .input(TransactionInput::new(calldata.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, hex};
    use alloy_sol_types::SolValue;

    const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    const OWNER: Address = address!("1111111111111111111111111111111111111111");
    const SPENDER: Address = address!("bd3fa81b58ba92a82136038b25adec7066af3155");

    #[test]
    fn test_selectors() {
        let token = Erc20Contract::new(USDC);

        let balance = token.balance_of_call(OWNER);
        assert_eq!(hex::encode(&balance.input.input().unwrap()[..4]), "70a08231");

        let allowance = token.allowance_call(OWNER, SPENDER);
        assert_eq!(hex::encode(&allowance.input.input().unwrap()[..4]), "dd62ed3e");

        let approve = token.approve_transaction(OWNER, SPENDER, U256::from(5u64));
        assert_eq!(hex::encode(&approve.input.input().unwrap()[..4]), "095ea7b3");
        assert_eq!(approve.from, Some(OWNER));
    }

    #[test]
    fn test_decode_amount() {
        let encoded = U256::from(123_456u64).abi_encode();
        assert_eq!(
            Erc20Contract::decode_amount(&encoded).unwrap(),
            U256::from(123_456u64)
        );
        assert!(Erc20Contract::decode_amount(&[0u8; 3]).is_err());
    }
}
