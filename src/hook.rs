use std::error::Error;
use std::fmt::{self, Display};
use std::str::FromStr;

use crate::site::ExecutionContext;

/// Read filters run early, before other content transforms.
pub const READ_PRIORITY: u8 = 9;
/// Insert filters run last before persistence.
pub const INSERT_PRIORITY: u8 = 99;
/// Term-description pre-save filters run early.
pub const PRE_TERM_PRIORITY: u8 = 5;

/// The fixed set of read-path interception points.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ReadHook {
    TheContent,
    TheContentExport,
    TheContentFeed,
    TheExcerptRss,
    GetCommentAuthorLink,
    GetCommentExcerpt,
    GetCommentText,
    GetTheExcerpt,
    GetTheGuid,
    TermDescription,
    WidgetText,
}

impl ReadHook {
    pub const ALL: [ReadHook; 11] = [
        ReadHook::TheContent,
        ReadHook::TheContentExport,
        ReadHook::TheContentFeed,
        ReadHook::TheExcerptRss,
        ReadHook::GetCommentAuthorLink,
        ReadHook::GetCommentExcerpt,
        ReadHook::GetCommentText,
        ReadHook::GetTheExcerpt,
        ReadHook::GetTheGuid,
        ReadHook::TermDescription,
        ReadHook::WidgetText,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReadHook::TheContent => "the_content",
            ReadHook::TheContentExport => "the_content_export",
            ReadHook::TheContentFeed => "the_content_feed",
            ReadHook::TheExcerptRss => "the_excerpt_rss",
            ReadHook::GetCommentAuthorLink => "get_comment_author_link",
            ReadHook::GetCommentExcerpt => "get_comment_excerpt",
            ReadHook::GetCommentText => "get_comment_text",
            ReadHook::GetTheExcerpt => "get_the_excerpt",
            ReadHook::GetTheGuid => "get_the_guid",
            ReadHook::TermDescription => "term_description",
            ReadHook::WidgetText => "widget_text",
        }
    }
}

/// Write-path interception points. Term-description pre-save filters exist
/// once per taxonomy known to the platform.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum WriteHook {
    InsertPostData,
    InsertAttachmentData,
    PreTermDescription(String),
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum HookPoint {
    Read(ReadHook),
    Write(WriteHook),
}

impl Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            HookPoint::Read(hook) => f.write_str(hook.name()),
            HookPoint::Write(WriteHook::InsertPostData) => f.write_str("wp_insert_post_data"),
            HookPoint::Write(WriteHook::InsertAttachmentData) => {
                f.write_str("wp_insert_attachment_data")
            }
            HookPoint::Write(WriteHook::PreTermDescription(taxonomy)) => {
                write!(f, "pre_{}_description", taxonomy)
            }
        }
    }
}

impl FromStr for HookPoint {
    type Err = UnknownHook;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if let Some(hook) = ReadHook::ALL.iter().copied().find(|hook| hook.name() == name) {
            return Ok(HookPoint::Read(hook));
        }

        match name {
            "wp_insert_post_data" => return Ok(HookPoint::Write(WriteHook::InsertPostData)),
            "wp_insert_attachment_data" => {
                return Ok(HookPoint::Write(WriteHook::InsertAttachmentData))
            }
            _ => (),
        }

        if let Some(taxonomy) = name
            .strip_prefix("pre_")
            .and_then(|rest| rest.strip_suffix("_description"))
        {
            if !taxonomy.is_empty() {
                return Ok(HookPoint::Write(WriteHook::PreTermDescription(
                    taxonomy.to_owned(),
                )));
            }
        }

        Err(UnknownHook(name.to_owned()))
    }
}

#[derive(Debug)]
pub struct UnknownHook(String);

impl Display for UnknownHook {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown interception point `{}`", self.0)
    }
}

impl Error for UnknownHook {}

/// Which rewrite a bound hook performs.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transform {
    Outbound,
    Inbound,
    InboundDeep,
}

#[derive(Clone, Debug)]
pub struct Binding {
    pub point: HookPoint,
    pub transform: Transform,
    pub priority: u8,
}

/// The set of hook bindings for one activation decision, built once when the
/// site context switches and looked up by enum tag thereafter.
#[derive(Clone, Debug, Default)]
pub struct FilterPlan {
    bindings: Vec<Binding>,
}

impl FilterPlan {
    pub fn inactive() -> Self {
        FilterPlan::default()
    }

    pub fn build(active: bool, context: ExecutionContext, taxonomies: &[String]) -> Self {
        if !active {
            return FilterPlan::inactive();
        }

        let bindings = match context {
            ExecutionContext::Public => ReadHook::ALL
                .iter()
                .map(|&hook| Binding {
                    point: HookPoint::Read(hook),
                    transform: Transform::Outbound,
                    priority: READ_PRIORITY,
                })
                .collect(),
            ExecutionContext::Admin => {
                let mut bindings = vec![
                    Binding {
                        point: HookPoint::Write(WriteHook::InsertPostData),
                        transform: Transform::InboundDeep,
                        priority: INSERT_PRIORITY,
                    },
                    Binding {
                        point: HookPoint::Write(WriteHook::InsertAttachmentData),
                        transform: Transform::InboundDeep,
                        priority: INSERT_PRIORITY,
                    },
                ];
                for taxonomy in taxonomies {
                    bindings.push(Binding {
                        point: HookPoint::Write(WriteHook::PreTermDescription(taxonomy.clone())),
                        transform: Transform::Inbound,
                        priority: PRE_TERM_PRIORITY,
                    });
                }
                bindings
            }
        };

        FilterPlan { bindings }
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn lookup(&self, point: &HookPoint) -> Option<&Binding> {
        self.bindings.iter().find(|binding| binding.point == *point)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
