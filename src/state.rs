use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown state code: {0}")]
pub struct UnknownState(pub String);

macro_rules! states {
    ($($code:ident),+ $(,)?) => {
        #[allow(clippy::upper_case_acronyms)]
        #[derive(
            Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub enum State {
            $($code),+
        }

        impl State {
            pub fn all() -> Vec<Self> {
                vec![$(Self::$code),+]
            }

            pub fn code(&self) -> &'static str {
                match self {
                    $(Self::$code => stringify!($code)),+
                }
            }
        }
    };
}

// selectbox order, DC sits between CT and DE
states![
    AL, AK, AZ, AR, CA, CO, CT, DC, DE, FL, GA, HI, ID, IL, IN, IA, KS, KY, LA, ME, MD, MA, MI,
    MN, MS, MO, MT, NE, NV, NH, NJ, NM, NY, NC, ND, OH, OK, OR, PA, RI, SC, SD, TN, TX, UT, VT,
    VA, WA, WV, WI, WY,
];

impl State {
    /// Position in [`State::all`], used as the starting cursor of the select box.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl Default for State {
    fn default() -> Self {
        Self::MA
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for State {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::all()
            .into_iter()
            .find(|x| x.code() == code)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}
