use super::*;

/// The raw username as submitted by a miner, before it is split into address/workername.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(pub String);

/// A stable, chain-agnostic identifier derived from the address portion of a pool-mode
/// username. This system does not validate any particular chain's address format; it only
/// requires the address text to be non-empty and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct AccountId(String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUsername {
    pub account: AccountId,
    pub workername: String,
}

/// Network parameters consulted when deriving a pool-mode account id from the address portion
/// of a username, per §6's read-only `active_net` capability. This system speaks a Decred-style
/// protocol (Blake256 block hashing), so the prefixes it checks are Decred's mainnet/testnet
/// script-hash conventions rather than a particular chain-agnostic stand-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveNet {
    Mainnet,
    Testnet,
}

impl ActiveNet {
    fn address_prefix(self) -> &'static str {
        match self {
            ActiveNet::Mainnet => "Ss",
            ActiveNet::Testnet => "Ts",
        }
    }

    /// Validates `address` against this network's prefix and derives a stable account id from
    /// it. This does not implement full address decoding (base58check, checksum); it enforces
    /// the one thing the active network parameters are consulted for here: that the address
    /// actually belongs to the configured network.
    fn derive_account_id(self, address: &str) -> std::result::Result<AccountId, AddressError> {
        if !address.starts_with(self.address_prefix()) {
            return Err(AddressError::WrongNetwork {
                address: address.to_string(),
            });
        }

        Ok(AccountId(address.to_string()))
    }
}

impl Username {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.trim_matches('"')
    }

    /// Parses a pool-mode username of the form `account.workername`. The dot is mandatory; the
    /// account part must be non-empty, free of ASCII whitespace, and a valid address under
    /// `active_net`.
    pub fn parse_pool(
        &self,
        active_net: ActiveNet,
    ) -> std::result::Result<ParsedUsername, AddressError> {
        let raw = self.as_str();
        let mut parts = raw.splitn(2, '.');

        let account = parts.next().filter(|s| !s.is_empty()).ok_or(AddressError::EmptyUsername)?;
        let workername = parts
            .next()
            .ok_or_else(|| AddressError::Malformed {
                account: account.to_string(),
            })?
            .to_string();

        if account.chars().any(char::is_whitespace) {
            return Err(AddressError::Malformed {
                account: account.to_string(),
            });
        }

        let account = active_net.derive_account_id(account)?;

        Ok(ParsedUsername { account, workername })
    }

    /// Parses a solo-mode username: the entire string is the worker name, no account lookup.
    pub fn parse_solo(&self) -> std::result::Result<String, AddressError> {
        let raw = self.as_str();
        if raw.is_empty() {
            return Err(AddressError::EmptyUsername);
        }
        Ok(raw.to_string())
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum AddressError {
    #[snafu(display("username cannot be empty"))]
    EmptyUsername,
    #[snafu(display("malformed account {account:?}"))]
    Malformed { account: String },
    #[snafu(display("address {address:?} does not belong to the active network"))]
    WrongNetwork { address: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "SsWKp7wtdTZYabYFYSc9cnxhwFEjA5g4pFc";

    #[test]
    fn pool_mode_splits_on_first_dot() {
        let username = Username::new(format!("{ADDRESS}.rig1"));
        let parsed = username.parse_pool(ActiveNet::Mainnet).unwrap();
        assert_eq!(parsed.account.as_str(), ADDRESS);
        assert_eq!(parsed.workername, "rig1");
    }

    #[test]
    fn pool_mode_without_dot_is_rejected() {
        assert_eq!(
            Username::new(ADDRESS)
                .parse_pool(ActiveNet::Mainnet)
                .unwrap_err(),
            AddressError::Malformed {
                account: ADDRESS.to_string()
            }
        );
    }

    #[test]
    fn pool_mode_with_empty_workername_after_dot_is_accepted() {
        let username = Username::new(format!("{ADDRESS}."));
        let parsed = username.parse_pool(ActiveNet::Mainnet).unwrap();
        assert_eq!(parsed.account.as_str(), ADDRESS);
        assert_eq!(parsed.workername, "");
    }

    #[test]
    fn pool_mode_rejects_empty_username() {
        assert_eq!(
            Username::new("").parse_pool(ActiveNet::Mainnet).unwrap_err(),
            AddressError::EmptyUsername
        );
    }

    #[test]
    fn pool_mode_rejects_address_from_the_wrong_network() {
        let username = Username::new(format!("{ADDRESS}.rig1"));
        assert_eq!(
            username.parse_pool(ActiveNet::Testnet).unwrap_err(),
            AddressError::WrongNetwork {
                address: ADDRESS.to_string()
            }
        );
    }

    #[test]
    fn solo_mode_keeps_whole_string() {
        assert_eq!(Username::new("rig1").parse_solo().unwrap(), "rig1");
    }
}
