use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::join::{JoinKeys, JoinPlan};

/// Logical tables inside an Open States bulk export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Bills,
    Actions,
    Sources,
    Sponsorships,
    Versions,
    VersionLinks,
    Votes,
    VotePeople,
    VoteSources,
    Organizations,
}

impl FileType {
    pub const ALL: [FileType; 10] = [
        FileType::Bills,
        FileType::Actions,
        FileType::Sources,
        FileType::Sponsorships,
        FileType::Versions,
        FileType::VersionLinks,
        FileType::Votes,
        FileType::VotePeople,
        FileType::VoteSources,
        FileType::Organizations,
    ];

    /// Suffix of the archive member holding this table.
    pub const fn suffix(self) -> &'static str {
        match self {
            FileType::Bills => "_bills.csv",
            FileType::Actions => "_bill_actions.csv",
            FileType::Sources => "_bill_sources.csv",
            FileType::Sponsorships => "_bill_sponsorships.csv",
            FileType::Versions => "_bill_versions.csv",
            FileType::VersionLinks => "_bill_version_links.csv",
            FileType::Votes => "_votes.csv",
            FileType::VotePeople => "_vote_people.csv",
            FileType::VoteSources => "_vote_sources.csv",
            FileType::Organizations => "_organizations.csv",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FileType::Bills => "Bills",
            FileType::Actions => "Actions",
            FileType::Sources => "Sources",
            FileType::Sponsorships => "Sponsorships",
            FileType::Versions => "Versions",
            FileType::VersionLinks => "VersionLinks",
            FileType::Votes => "Votes",
            FileType::VotePeople => "VotePeople",
            FileType::VoteSources => "VoteSources",
            FileType::Organizations => "Organizations",
        }
    }

    /// Related tables this type is joined against by `load_joined`.
    pub const fn join_plan(self) -> JoinPlan {
        match self {
            FileType::Actions | FileType::Sources | FileType::Versions | FileType::Sponsorships => {
                JoinPlan::Parent {
                    parent: FileType::Bills,
                    keys: JoinKeys {
                        left_on: "id",
                        right_on: "bill_id",
                        suffixes: ("bill", ""),
                    },
                }
            }
            FileType::VersionLinks => JoinPlan::Chain {
                root: FileType::Bills,
                middle: FileType::Versions,
                first: JoinKeys {
                    left_on: "id",
                    right_on: "bill_id",
                    suffixes: ("_bill", "_version"),
                },
                second: JoinKeys {
                    left_on: "id_version",
                    right_on: "version_id",
                    suffixes: ("", "_link"),
                },
            },
            FileType::VotePeople | FileType::VoteSources => JoinPlan::Parent {
                parent: FileType::Votes,
                keys: JoinKeys {
                    left_on: "id",
                    right_on: "vote_event_id",
                    suffixes: ("vote", ""),
                },
            },
            FileType::Bills | FileType::Votes | FileType::Organizations => JoinPlan::Identity,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileType {
    type Err = Error;

    /// Accepts the variant name (case-insensitive) or the member suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FileType::ALL
            .into_iter()
            .find(|ft| ft.name().eq_ignore_ascii_case(s) || ft.suffix() == s)
            .ok_or_else(|| Error::UnknownFileType(s.to_string()))
    }
}
