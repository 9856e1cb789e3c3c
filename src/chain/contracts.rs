//! ABI definitions for the vault contracts

#![allow(clippy::too_many_arguments)]

use alloy_sol_types::sol;

sol! {
    // ERC-20, also implemented by the vault share token
    function name() external view returns (string);
    function symbol() external view returns (string);
    function decimals() external view returns (uint8);
    function totalSupply() external view returns (uint256);
    function balanceOf(address owner) external view returns (uint256);
    function allowance(address owner, address spender) external view returns (uint256);
    function approve(address spender, uint256 amount) external returns (bool);

    // Accountant and rate providers
    function getRate() external view returns (uint256);
    function getRateInQuoteSafe(address quote) external view returns (uint256);

    // Teller
    function deposit(address depositAsset, uint256 depositAmount, uint256 minimumMint) external payable returns (uint256 shares);

    // Roles authority
    function canCall(address user, address target, bytes4 functionSig) external view returns (bool);

    // Atomic queue
    struct AtomicUserRequest {
        uint64 deadline;
        uint88 atomicPrice;
        uint96 offerAmount;
        bool inSolve;
    }

    function safeUpdateAtomicRequest(address offer, address want, AtomicUserRequest userRequest, address accountant, uint256 discount) external;
}
