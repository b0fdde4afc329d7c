use serde_json::{json, Value};

use shared::models::{Entity, Menu, Reply, Role};
use shared::{BroadcastReport, Error};

use crate::dates;
use crate::session::Mode;

pub fn home_menu(role: Role) -> Menu {
    if role.is_admin() {
        Menu::Admin
    } else {
        Menu::Main
    }
}

pub fn greeting() -> Reply {
    Reply::menu(
        "สวัสดีค่ะ! ยินดีต้อนรับ 🎉\n\n📅 ระบบแจ้งเตือนกิจกรรม\n• ล่าสุด - ดูกิจกรรมต่างๆ\n• /search - ค้นหากิจกรรม\n\n📞 สมุดเบอร์โทร\n• เพิ่มเบอร์ ชื่อ เบอร์\n• หาเบอร์ ชื่อ\n• เบอร์ทั้งหมด\n\nเลือกได้จากเมนูด้านล่าง 👇",
        Menu::Main,
    )
}

pub fn fallback(role: Role) -> Reply {
    Reply::menu(
        "ขอโทษค่ะ ไม่เข้าใจคำสั่งนี้\n\n💡 ลองพิมพ์ สวัสดี เพื่อดูเมนูหลัก\nหรือ /search เพื่อค้นหากิจกรรม",
        home_menu(role),
    )
}

pub fn forbidden(role: Role) -> Reply {
    Reply::menu(
        "❌ คุณไม่มีสิทธิ์ใช้คำสั่งนี้ค่ะ\n\nเฉพาะ Admin เท่านั้นที่สามารถใช้ฟีเจอร์นี้ได้",
        home_menu(role),
    )
}

/// Distinct from every terminal reply so a cancel is never mistaken for a
/// commit. Wording depends on what kind of flow was abandoned.
pub fn cancelled(role: Role, mode: Mode) -> Reply {
    match mode {
        Mode::Search => Reply::menu("❌ ยกเลิกการค้นหาแล้วค่ะ", home_menu(role)),
        _ => Reply::menu("❌ ยกเลิกการดำเนินการแล้วค่ะ", home_menu(role)),
    }
}

pub fn from_error(error: Error, role: Role) -> Reply {
    match error {
        Error::Validation(msg) => Reply::menu(format!("❌ {msg}"), home_menu(role)),
        Error::Permission => forbidden(role),
        Error::NotFound(what) => {
            Reply::menu(format!("❌ ไม่พบข้อมูล: {what}"), home_menu(role))
        }
        Error::Executor(_) => Reply::menu(
            "เกิดข้อผิดพลาดค่ะ กรุณาลองใหม่อีกครั้ง",
            home_menu(role),
        ),
    }
}

pub fn admin_menu() -> Reply {
    Reply::menu(
        "🔧 เมนู Admin\n\n📅 จัดการกิจกรรม:\n• เพิ่มกิจกรรม\n• จัดการกิจกรรม\n• ส่งแจ้งเตือน\n\n💡 คำสั่งเดิม:\n• /add ชื่อ | รายละเอียด | 2025-01-20\n• /edit, /delete, /notify, /list",
        Menu::Admin,
    )
}

// ---- event presentation -------------------------------------------------

pub fn event_card(entity: &Entity) -> Value {
    json!({
        "id": entity.id,
        "title": entity.title(),
        "description": entity.description(),
        "date": entity.date(),
        "date_thai": dates::format_thai(entity.date()),
    })
}

pub fn events_payload(events: &[Entity]) -> Value {
    json!({ "events": events.iter().map(event_card).collect::<Vec<_>>() })
}

pub fn event_list(events: &[Entity], caption: String, role: Role) -> Reply {
    if events.is_empty() {
        return Reply::menu("ยังไม่มีกิจกรรมที่บันทึกไว้ค่ะ", home_menu(role));
    }
    Reply::menu(caption, home_menu(role)).with_payload(events_payload(events))
}

pub fn event_created(entity_id: uuid::Uuid, title: &str, description: &str, date: &str) -> Reply {
    Reply::menu(
        format!(
            "✅ เพิ่มกิจกรรมสำเร็จ!\n\n📝 {title}\n📋 {description}\n📅 {date}\n🆔 ID: {entity_id}",
            date = dates::format_thai(date),
        ),
        Menu::Admin,
    )
}

pub fn event_updated(entity: &Entity) -> Reply {
    Reply::menu(
        format!(
            "✅ แก้ไขกิจกรรมเรียบร้อยแล้ว!\n\n📝 {}\n📋 {}\n📅 {}",
            entity.title(),
            entity.description(),
            dates::format_thai(entity.date()),
        ),
        Menu::Admin,
    )
    .with_payload(event_card(entity))
}

pub fn event_deleted(entity: &Entity) -> Reply {
    Reply::menu(
        format!(
            "🗑️ ลบกิจกรรมเรียบร้อยแล้วค่ะ!\n\n📝 {}\n🆔 ID: {}",
            entity.title(),
            entity.id
        ),
        Menu::Admin,
    )
}

pub fn delete_confirmation(entity: &Entity) -> Reply {
    Reply {
        text: format!(
            "🗑️ ยืนยันการลบกิจกรรม?\n\n🆔 ID: {}\n📝 {}\n📋 {}\n📅 {}\n\n⚠️ การลบไม่สามารถย้อนกลับได้!",
            entity.id,
            entity.title(),
            entity.description(),
            dates::format_thai(entity.date()),
        ),
        prompt: shared::models::Prompt::Menu(Menu::ConfirmDelete),
        payload: Some(event_card(entity)),
    }
}

pub fn broadcast_done(message: &str, report: BroadcastReport) -> Reply {
    Reply::menu(
        format!(
            "📢 ส่งข้อความสำเร็จ!\n\n💬 ข้อความ: {message}\n✅ ส่งสำเร็จ: {sent} คน\n❌ ส่งไม่สำเร็จ: {failed} คน\n\n📊 รวม: {total} คน",
            sent = report.sent,
            failed = report.failed,
            total = report.total(),
        ),
        Menu::Admin,
    )
}

// ---- contact presentation -----------------------------------------------

pub fn contact_payload(contacts: &[Entity]) -> Value {
    json!({
        "contacts": contacts
            .iter()
            .map(|c| json!({
                "id": c.id,
                "name": c.get(shared::models::field::NAME),
                "phone": c.get(shared::models::field::PHONE),
            }))
            .collect::<Vec<_>>()
    })
}

pub fn contact_saved(name: &str, phone: &str) -> Reply {
    Reply::menu(
        format!(
            "✅ บันทึกเบอร์เรียบร้อย!\n\n📝 ชื่อ: {name}\n📞 เบอร์: {phone}\n\n💡 ลองค้นหาดู: หาเบอร์ {name}"
        ),
        Menu::Contacts,
    )
}

pub fn contact_help() -> Reply {
    Reply::menu(
        "📞 วิธีใช้งานสมุดเบอร์โทร\n\n📝 เพิ่มเบอร์:\n• เพิ่มเบอร์ สมชาย 081-234-5678\n• เก็บเบอร์ คุณแม่ 02-123-4567\n\n🔍 หาเบอร์:\n• หาเบอร์ สมชาย\n• ค้นหา 081\n• หา สมชาย 081\n\n💡 พิมพ์แค่บางส่วนก็ได้ ค้นหาได้หลายคำพร้อมกัน",
        Menu::Contacts,
    )
}

// ---- guided-flow prompts ------------------------------------------------

pub fn add_event_title_prompt() -> Reply {
    Reply::cancelable(
        "📝 เพิ่มกิจกรรมใหม่ - ขั้นตอน 1/3\n\n🔸 ส่งชื่อกิจกรรม\n\nตัวอย่าง:\n• บัตรข้าราชการตำรวจ\n• การประชุมทีมงาน\n\n💬 แค่พิมพ์ชื่อกิจกรรมแล้วส่งมา",
    )
}

pub fn add_event_description_prompt(title: &str) -> Reply {
    Reply::cancelable(format!(
        "📝 เพิ่มกิจกรรมใหม่ - ขั้นตอน 2/3\n\n✅ ชื่อ: {title}\n\n🔸 ส่งรายละเอียดกิจกรรม"
    ))
}

pub fn add_event_date_prompt(title: &str, description: &str) -> Reply {
    Reply::date_picker(format!(
        "📝 เพิ่มกิจกรรมใหม่ - ขั้นตอน 3/3\n\n✅ ชื่อ: {title}\n✅ รายละเอียด: {description}\n\n🔸 ส่งวันที่กิจกรรม (YYYY-MM-DD)"
    ))
}

pub fn search_menu() -> Reply {
    Reply::menu(
        "🔍 เลือกประเภทการค้นหา\n\n🔸 ค้นหาข้อความ - ค้นจากชื่อหรือรายละเอียด\n🔸 ค้นหาวันที่ - ค้นกิจกรรมในวันที่เฉพาะ\n🔸 ค้นหาทั้งหมด - พิมพ์คำค้นเองได้ทุกรูปแบบ\n\nเลือกปุ่มด้านล่างเพื่อเริ่มค้นหา",
        Menu::Search,
    )
}

pub fn search_text_prompt() -> Reply {
    Reply::cancelable("📝 พิมพ์คำที่ต้องการค้นหาในชื่อหรือรายละเอียดกิจกรรม")
}

pub fn search_date_prompt() -> Reply {
    Reply::date_picker("📅 ส่งวันที่ที่ต้องการค้นหา (YYYY-MM-DD)")
}

pub fn search_free_prompt() -> Reply {
    Reply::cancelable("🔍 พิมพ์คำค้นหาได้ทุกรูปแบบ จะเป็นข้อความหรือวันที่ก็ได้")
}

pub fn search_results(term: &str, events: &[Entity], role: Role) -> Reply {
    if events.is_empty() {
        return Reply::menu(
            format!("🔍 ไม่พบกิจกรรมที่ตรงกับ '{term}'"),
            home_menu(role),
        );
    }
    Reply::menu(
        format!("🔍 ค้นหา '{term}' พบ {} รายการ", events.len()),
        home_menu(role),
    )
    .with_payload(events_payload(events))
}

pub fn edit_menu(entity: &Entity) -> Reply {
    Reply {
        text: format!(
            "✏️ แก้ไขกิจกรรม ID: {}\n\n📝 ชื่อ: {}\n📋 รายละเอียด: {}\n📅 วันที่: {}\n\n🔸 เลือกส่วนที่ต้องการแก้ไข: แก้ชื่อ / แก้รายละเอียด / แก้วันที่ / แก้ทั้งหมด",
            entity.id,
            entity.title(),
            entity.description(),
            dates::format_thai(entity.date()),
        ),
        prompt: shared::models::Prompt::Menu(Menu::Edit),
        payload: Some(event_card(entity)),
    }
}

pub fn edit_title_prompt(current: &str) -> Reply {
    Reply::cancelable(format!("📝 ส่งชื่อใหม่\n\nปัจจุบัน: {current}"))
}

pub fn edit_description_prompt(current: &str) -> Reply {
    Reply::cancelable(format!("📋 ส่งรายละเอียดใหม่\n\nปัจจุบัน: {current}"))
}

pub fn edit_date_prompt(current: &str) -> Reply {
    Reply::date_picker(format!(
        "📅 ส่งวันที่ใหม่ (YYYY-MM-DD)\n\nปัจจุบัน: {}",
        dates::format_thai(current)
    ))
}

pub fn edit_all_prompt(step_name: &str, current: &str) -> Reply {
    Reply::cancelable(format!(
        "🔄 แก้ทั้งหมด - {step_name}\n\nปัจจุบัน: {current}\n\n💬 ส่งค่าใหม่ หรือพิมพ์ \"เหมือนเดิม\" เพื่อคงค่าเดิม"
    ))
}

pub fn notify_menu(subscriber_count: usize, upcoming_count: usize) -> Reply {
    Reply::menu(
        format!(
            "📢 ส่งแจ้งเตือนให้ผู้สมัคร\n\n👥 จำนวนผู้สมัครปัจจุบัน: {subscriber_count} คน\n📅 กิจกรรมถัดไป: {upcoming_count} รายการ\n\n🔸 เลือกประเภทการแจ้งเตือน:\n• ข้อความกำหนดเอง\n• แจ้งกิจกรรมถัดไป\n• ดูสถิติผู้สมัคร"
        ),
        Menu::Notify,
    )
}

pub fn notify_custom_prompt() -> Reply {
    Reply::cancelable(
        "📝 ข้อความกำหนดเอง\n\n🔸 พิมพ์ข้อความที่ต้องการส่ง\n\n💬 จะส่งให้ผู้สมัครทุกคน",
    )
}
