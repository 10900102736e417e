pub mod department_service;
pub mod member_service;

pub use department_service::DepartmentService;
pub use member_service::MemberService;

use crate::models::{Member, MemberPage};

/// Slice an already-filtered member list into one page. The full set is
/// fetched before paging; the store offers no cursor to do better.
pub(crate) fn paginate(members: Vec<Member>, page: usize, limit: usize) -> MemberPage {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = members.len();
    let start = (page - 1) * limit;
    let end = (start + limit).min(total);
    let page_members = if start < total {
        members[start..end].to_vec()
    } else {
        Vec::new()
    };
    MemberPage {
        members: page_members,
        total,
        page,
        total_pages: total.div_ceil(limit),
        has_more: end < total,
    }
}
