use crate::application::deps::ServiceDependencies;
use crate::application::booking::BookingApplicationError;
use crate::domain::{Comment, commands::AddComment};

use super::Result;
use super::item_view_service::CommentView;

/// アイテムにコメントを残す
///
/// ビジネスルール：
/// - 投稿者が存在すること
/// - アイテムが存在すること
/// - 投稿者がそのアイテムで完了済みのAPPROVED予約を持つこと。
///   WAITING/REJECTED、あるいはまだ終わっていない予約では資格にならない
pub async fn add_comment(deps: &ServiceDependencies, cmd: AddComment) -> Result<CommentView> {
    // 1. 投稿者の存在確認（表示名もここで得る）
    let author = deps
        .user_directory
        .get(cmd.author_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?
        .ok_or(BookingApplicationError::UserNotFound(cmd.author_id))?;

    // 2. アイテムの存在確認
    deps.item_directory
        .get(cmd.item_id)
        .await
        .map_err(BookingApplicationError::ItemDirectoryError)?
        .ok_or(BookingApplicationError::ItemNotFound(cmd.item_id))?;

    // 3. コメント資格：過去に借り終えていること
    let has_finished = deps
        .booking_store
        .has_finished_booking(cmd.author_id, cmd.item_id, cmd.created_at)
        .await
        .map_err(BookingApplicationError::StoreError)?;

    if !has_finished {
        return Err(BookingApplicationError::Validation(format!(
            "User {} can only comment on items they have booked in the past",
            cmd.author_id
        )));
    }

    // 4. 保存してビューを返す
    let comment = Comment::new(cmd.item_id, cmd.author_id, cmd.text, cmd.created_at);
    let saved = deps
        .comment_store
        .save(&comment)
        .await
        .map_err(BookingApplicationError::CommentStoreError)?;

    Ok(CommentView {
        comment_id: saved.comment_id,
        text: saved.text,
        author_name: author.name,
        created_at: saved.created_at,
    })
}
