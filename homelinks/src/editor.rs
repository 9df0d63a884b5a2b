//! Editor tool: edits a loaded homepage configuration in memory
//!
//! Unlike the builder, the editor keeps categories that lose their last
//! bookmark, and can always return to the text it loaded.

use crate::document::{
    Bookmark, BookmarkDraft, BookmarkPatch, DedupReport, Document, MoveTarget, ValidationError,
};
use crate::format::{self, FormatError};
use crate::session::EditSession;

/// Example configuration offered to new users
pub const SAMPLE_YAML: &str = "\
- Developer:
    - GitHub:
        - abbr: GH
          href: https://github.com
          description: 全球最大的代码托管平台
    - Stack Overflow:
        - abbr: SO
          href: https://stackoverflow.com
          description: 程序员必备的问答社区
    - VS Code:
        - abbr: VS
          href: https://code.visualstudio.com
          description: 微软开发的轻量级代码编辑器

- Entertainment:
    - YouTube:
        - abbr: YT
          href: https://youtube.com
          description: 全球最大的视频分享平台
    - Netflix:
        - abbr: NF
          href: https://netflix.com
          description: 流媒体视频服务平台

- Productivity:
    - Google Drive:
        - abbr: GD
          href: https://drive.google.com
          description: 云端存储和协作平台
    - Notion:
        - abbr: NT
          href: https://notion.so
          description: 全能的笔记和知识管理工具
";

/// In-memory editor over a parsed configuration
#[derive(Debug, Clone)]
pub struct LinkEditor {
    session: EditSession,
}

impl LinkEditor {
    pub fn load(text: &str) -> Result<Self, FormatError> {
        let document = format::deserialize(text)?;
        tracing::debug!(
            categories = document.categories().len(),
            bookmarks = document.total_bookmarks(),
            "Configuration loaded"
        );
        Ok(Self {
            session: EditSession::new(document),
        })
    }

    /// Load new text, keeping the current session when it does not parse
    pub fn reload(&mut self, text: &str) -> Result<(), FormatError> {
        *self = Self::load(text)?;
        Ok(())
    }

    pub fn document(&self) -> &Document {
        self.session.current()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Append an empty category, or find the existing one with that name
    pub fn add_category(&mut self, name: &str) -> usize {
        self.session.current_mut().add_category(name)
    }

    /// Validate a form draft and append it to a category
    pub fn add_bookmark(
        &mut self,
        category: usize,
        draft: BookmarkDraft,
    ) -> Result<usize, ValidationError> {
        let bookmark = draft.into_bookmark()?;
        self.session.current_mut().add_bookmark_at(category, bookmark)
    }

    pub fn edit_bookmark(
        &mut self,
        category: usize,
        index: usize,
        patch: &BookmarkPatch,
    ) -> Result<(), ValidationError> {
        self.session
            .current_mut()
            .edit_bookmark(category, index, patch)
    }

    pub fn delete_bookmark(
        &mut self,
        category: usize,
        index: usize,
    ) -> Result<Bookmark, ValidationError> {
        self.session.current_mut().delete_bookmark(category, index)
    }

    pub fn move_bookmark(
        &mut self,
        source_category: usize,
        source_index: usize,
        target_category: usize,
        target: MoveTarget,
    ) -> Result<(usize, usize), ValidationError> {
        self.session.current_mut().move_bookmark(
            source_category,
            source_index,
            target_category,
            target,
        )
    }

    pub fn find_duplicates(&self) -> DedupReport {
        self.document().find_duplicates()
    }

    pub fn deduplicate(&mut self) -> DedupReport {
        self.session.current_mut().deduplicate()
    }

    /// Discard every change since the last load
    pub fn reset(&mut self) -> &Document {
        self.session.reset()
    }

    pub fn has_changes(&self) -> bool {
        self.session.has_changes()
    }

    pub fn export_yaml(&self) -> String {
        format::serialize(self.document())
    }
}
