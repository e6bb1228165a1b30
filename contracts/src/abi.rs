//! Embedded contract ABIs.
//!
//! Trimmed to the functions and events the engine actually uses; the chain
//! client receives the ABI verbatim alongside each call.

pub const WILLS_ABI: &str = r#"[
  {"type":"function","name":"createWill","stateMutability":"payable","inputs":[{"name":"_to","type":"address"},{"name":"_period","type":"uint256"},{"name":"_revokable","type":"bool"}],"outputs":[]},
  {"type":"function","name":"claimWill","stateMutability":"nonpayable","inputs":[{"name":"_id","type":"bytes32"}],"outputs":[]},
  {"type":"function","name":"verifyWill","stateMutability":"nonpayable","inputs":[{"name":"_id","type":"bytes32"}],"outputs":[]},
  {"type":"function","name":"getWill","stateMutability":"view","inputs":[{"name":"_id","type":"bytes32"}],"outputs":[{"name":"owner","type":"address"},{"name":"recipient","type":"address"},{"name":"amount","type":"uint256"},{"name":"revokable","type":"bool"},{"name":"maturityBlock","type":"uint256"}]},
  {"type":"event","name":"LogWillCreated","inputs":[{"name":"_id","type":"bytes32","indexed":false},{"name":"_creator","type":"address","indexed":true},{"name":"_recipient","type":"address","indexed":true},{"name":"_amount","type":"uint256","indexed":false}]},
  {"type":"event","name":"LogWillClaimed","inputs":[{"name":"_id","type":"bytes32","indexed":false},{"name":"_claimant","type":"address","indexed":true},{"name":"_amount","type":"uint256","indexed":false}]}
]"#;

pub const TRUST_ABI: &str = r#"[
  {"type":"function","name":"withdraw","stateMutability":"nonpayable","inputs":[],"outputs":[]},
  {"type":"function","name":"blocksUntilExpiration","stateMutability":"view","inputs":[],"outputs":[{"name":"","type":"uint256"}]},
  {"type":"event","name":"LogWithdraw","inputs":[{"name":"_beneficiary","type":"address","indexed":true},{"name":"_amount","type":"uint256","indexed":false}]},
  {"type":"event","name":"LogDeposit","inputs":[{"name":"_trustor","type":"address","indexed":true},{"name":"_amount","type":"uint256","indexed":false}]}
]"#;

pub const TRUST_FACTORY_ABI: &str = r#"[
  {"type":"function","name":"deployTrust","stateMutability":"payable","inputs":[{"name":"_to","type":"address"},{"name":"_revokable","type":"bool"},{"name":"_deadline","type":"uint256"}],"outputs":[]},
  {"type":"event","name":"LogNewTrust","inputs":[{"name":"_trustor","type":"address","indexed":true},{"name":"_beneficiary","type":"address","indexed":true},{"name":"_amount","type":"uint256","indexed":false},{"name":"_contractAddress","type":"address","indexed":false}]}
]"#;

pub const MYBIT_BURNER_ABI: &str = r#"[
  {"type":"function","name":"burn","stateMutability":"nonpayable","inputs":[{"name":"_tokenHolder","type":"address"},{"name":"_amount","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]}
]"#;

pub const MYBIT_TOKEN_ABI: &str = r#"[
  {"type":"function","name":"balanceOf","stateMutability":"view","inputs":[{"name":"_owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
  {"type":"function","name":"allowance","stateMutability":"view","inputs":[{"name":"_owner","type":"address"},{"name":"_spender","type":"address"}],"outputs":[{"name":"","type":"uint256"}]},
  {"type":"function","name":"approve","stateMutability":"nonpayable","inputs":[{"name":"_spender","type":"address"},{"name":"_value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}]},
  {"type":"event","name":"Approval","inputs":[{"name":"_owner","type":"address","indexed":true},{"name":"_spender","type":"address","indexed":true},{"name":"_value","type":"uint256","indexed":false}]}
]"#;
