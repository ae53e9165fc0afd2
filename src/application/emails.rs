// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notification::EmailMessage;
use crate::domain::models::report::Report;
use crate::domain::models::user::User;

/// 问候语中名字缺失时的回退称呼
fn greeting_name(user: &User) -> &str {
    user.first_name.as_deref().unwrap_or("there")
}

/// 渲染用户召回邮件
///
/// # 参数
///
/// * `user` - 目标用户
/// * `site_url` - 站点URL，用于邮件中的回访链接
pub fn render_we_miss_you(user: &User, site_url: &str) -> EmailMessage {
    let html = format!(
        "<p>Hi {},</p>\
         <p>It's been a while since we've seen you. A lot has happened \
         since your last visit.</p>\
         <p><a href=\"{}\">Come back and see what's new</a></p>",
        greeting_name(user),
        site_url
    );

    EmailMessage {
        subject: "We miss you! Come back and see what's new".to_string(),
        html,
        recipients: vec![user.email.clone()],
    }
}

/// 渲染举报确认邮件
///
/// 邮件内容包含举报编号和受理时间，因此必须在举报记录
/// 落库之后渲染。
///
/// # 参数
///
/// * `reporter` - 举报人
/// * `report` - 已落库的举报记录
pub fn render_report_confirmation(reporter: &User, report: &Report) -> EmailMessage {
    let html = format!(
        "<p>Hi {},</p>\
         <p>We received your report <strong>#{}</strong> on {} and our \
         moderators will review it shortly.</p>\
         <p>Thank you for helping keep the community safe.</p>",
        greeting_name(reporter),
        report.id,
        report.created_at.format("%Y-%m-%d %H:%M UTC"),
    );

    EmailMessage {
        subject: "We received your report".to_string(),
        html,
        recipients: vec![reporter.email.clone()],
    }
}
