use std::{fmt, str::FromStr};

/// The type of a gateway NAT rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NatRuleType {
    Snat,
    Dnat,
}

impl NatRuleType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Snat => "SNAT",
            Self::Dnat => "DNAT",
        }
    }
}

impl fmt::Display for NatRuleType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NatRuleType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SNAT" | "snat" => Ok(Self::Snat),
            "DNAT" | "dnat" => Ok(Self::Dnat),
            _ => Err(ParseKindError::NatRuleType(s.to_string())),
        }
    }
}

/// The action of a firewall rule, or the default action of the firewall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirewallPolicy {
    Allow,
    Drop,
}

impl FirewallPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Drop => "drop",
        }
    }
}

impl fmt::Display for FirewallPolicy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FirewallPolicy {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "allow" => Ok(Self::Allow),
            "drop" | "deny" => Ok(Self::Drop),
            _ => Err(ParseKindError::FirewallPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ParseKindError {
    #[error("invalid nat rule type: {0}")]
    NatRuleType(String),

    #[error("invalid firewall policy: {0}")]
    FirewallPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::{FirewallPolicy, NatRuleType};

    #[test]
    fn parse_kinds() {
        assert_eq!(NatRuleType::Dnat, "DNAT".parse().unwrap());
        assert_eq!(NatRuleType::Snat, "snat".parse().unwrap());
        assert!("1to1".parse::<NatRuleType>().is_err());
        assert_eq!(FirewallPolicy::Drop, "deny".parse().unwrap());
        assert_eq!("drop", FirewallPolicy::Drop.to_string());
    }
}
