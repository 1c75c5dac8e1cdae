use std::fmt;

/// Stages of the wizard, in the only order they can be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Step {
    AwaitingAddress = 1,
    AwaitingNetwork = 2,
    AwaitingCompilerType = 3,
    AwaitingLicense = 4,
    AwaitingSource = 5,
    AwaitingCompiler = 6,
}

impl Step {
    pub const FIRST: Self = Self::AwaitingAddress;
    pub const LAST: Self = Self::AwaitingCompiler;

    pub const fn number(self) -> u8 {
        self as u8
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::AwaitingAddress => Some(Self::AwaitingNetwork),
            Self::AwaitingNetwork => Some(Self::AwaitingCompilerType),
            Self::AwaitingCompilerType => Some(Self::AwaitingLicense),
            Self::AwaitingLicense => Some(Self::AwaitingSource),
            Self::AwaitingSource => Some(Self::AwaitingCompiler),
            Self::AwaitingCompiler => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::AwaitingAddress => None,
            Self::AwaitingNetwork => Some(Self::AwaitingAddress),
            Self::AwaitingCompilerType => Some(Self::AwaitingNetwork),
            Self::AwaitingLicense => Some(Self::AwaitingCompilerType),
            Self::AwaitingSource => Some(Self::AwaitingLicense),
            Self::AwaitingCompiler => Some(Self::AwaitingSource),
        }
    }

    /// Bot message shown when the step is entered.
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::AwaitingAddress => "Please enter your contract address.",
            Self::AwaitingNetwork => {
                "Great! Now please select the network where your contract is deployed."
            }
            Self::AwaitingCompilerType => "Please select the compiler type for your contract:",
            Self::AwaitingLicense => "Please select the license type for your contract:",
            Self::AwaitingSource => "Now I need the contract's source code and name. Please enter the contract name and paste the source code or upload a file.",
            Self::AwaitingCompiler => "Great! Finally, please select the compiler version and EVM version used for your contract.",
        }
    }

    /// Bot message shown when continue is requested before the step's
    /// input is complete.
    pub const fn reprompt(self) -> &'static str {
        match self {
            Self::AwaitingAddress => "Please enter a contract address before continuing.",
            Self::AwaitingNetwork => "Please select a network before continuing.",
            Self::AwaitingCompilerType => "Please select a compiler type before continuing.",
            Self::AwaitingLicense => "Please select a license type before continuing.",
            Self::AwaitingSource => {
                "Please provide both the contract name and source code before continuing."
            }
            Self::AwaitingCompiler => "Please select a compiler version before continuing.",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::AwaitingAddress => "Contract address",
            Self::AwaitingNetwork => "Network",
            Self::AwaitingCompilerType => "Compiler type",
            Self::AwaitingLicense => "License",
            Self::AwaitingSource => "Source code",
            Self::AwaitingCompiler => "Compiler",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.number(), self.title())
    }
}
