use crate::domain::models::{
    Announcement, BankDetails, Education, EmergencyContact, Employee, Priority, UserRole,
};
use crate::domain::salary::{Salary, SalaryBreakdown};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub struct SeedAccount<'a> {
    pub id: &'a str,
    pub password: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub role: UserRole,
    pub photo: &'a str,
}

pub fn accounts() -> Vec<SeedAccount<'static>> {
    vec![
        SeedAccount {
            id: "admin001",
            password: "admin123",
            name: "Sarah Johnson",
            email: "sarah.johnson@confidencefs.com",
            role: UserRole::Admin,
            photo: "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=100&h=100&fit=crop&crop=face",
        },
        SeedAccount {
            id: "emp001",
            password: "emp123",
            name: "John Doe",
            email: "john.doe@confidencefs.com",
            role: UserRole::Employee,
            photo: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=100&h=100&fit=crop&crop=face",
        },
    ]
}

struct SeedEmployee<'a> {
    id: &'a str,
    name: &'a str,
    photo: &'a str,
    designation: &'a str,
    department: &'a str,
    email: &'a str,
    join_date: (i32, u32, u32),
    phone: &'a str,
    ctc: (i64, i64),
    // basic, hra, conveyance, medical, pf, incentives, other
    breakdown: [i64; 7],
    bank: (&'a str, &'a str, &'a str),
    education: (&'a str, &'a str, &'a str),
    emergency: (&'a str, &'a str, &'a str),
}

impl SeedEmployee<'_> {
    fn build(&self) -> Option<Employee> {
        let (year, month, day) = self.join_date;
        let [basic, hra, conveyance, medical, pf, incentives, other] = self.breakdown.map(Decimal::from);
        Some(Employee {
            id: self.id.to_string(),
            name: self.name.to_string(),
            photo: self.photo.to_string(),
            email: self.email.to_string(),
            phone: self.phone.to_string(),
            department: self.department.to_string(),
            designation: self.designation.to_string(),
            join_date: NaiveDate::from_ymd_opt(year, month, day)?,
            salary: Some(Salary {
                annual_ctc: Decimal::from(self.ctc.0),
                monthly_ctc: Decimal::from(self.ctc.1),
                breakdown: SalaryBreakdown {
                    basic,
                    hra,
                    conveyance,
                    medical,
                    pf,
                    incentives,
                    other,
                },
            }),
            bank_details: Some(BankDetails {
                bank_name: self.bank.0.to_string(),
                account_number: self.bank.1.to_string(),
                ifsc: self.bank.2.to_string(),
            }),
            education: Some(Education {
                degree: self.education.0.to_string(),
                institute: self.education.1.to_string(),
                year: self.education.2.to_string(),
            }),
            emergency_contact: Some(EmergencyContact {
                name: self.emergency.0.to_string(),
                relationship: self.emergency.1.to_string(),
                phone: self.emergency.2.to_string(),
            }),
        })
    }
}

/// EMP003 carries a negative "other" component; it is kept as-is.
pub fn sample_employees() -> Vec<Employee> {
    let seeds = [
        SeedEmployee {
            id: "EMP001",
            name: "John Doe",
            photo: "https://images.unsplash.com/photo-1472099645785-5658abf4ff4e?w=40&h=40&fit=crop&crop=face",
            designation: "Senior Analyst",
            department: "Finance",
            email: "john.doe@confidencefs.com",
            join_date: (2022, 3, 15),
            phone: "+91 9876543210",
            ctc: (800000, 66667),
            breakdown: [30000, 15000, 5000, 2000, 3600, 8000, 3067],
            bank: ("State Bank of India", "12345678901", "SBIN0001234"),
            education: ("MBA Finance", "Delhi University", "2020"),
            emergency: ("Jane Doe", "Spouse", "+91 9876543211"),
        },
        SeedEmployee {
            id: "EMP002",
            name: "Priya Sharma",
            photo: "https://images.unsplash.com/photo-1494790108755-2616b612b786?w=40&h=40&fit=crop&crop=face",
            designation: "HR Manager",
            department: "Human Resources",
            email: "priya.sharma@confidencefs.com",
            join_date: (2021, 8, 10),
            phone: "+91 9876543211",
            ctc: (700000, 58333),
            breakdown: [25000, 12500, 4000, 2000, 3000, 6000, 5833],
            bank: ("HDFC Bank", "12345678902", "HDFC0001234"),
            education: ("MBA HR", "Mumbai University", "2019"),
            emergency: ("Raj Sharma", "Father", "+91 9876543212"),
        },
        SeedEmployee {
            id: "EMP003",
            name: "Rahul Patel",
            photo: "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=40&h=40&fit=crop&crop=face",
            designation: "Software Developer",
            department: "Technology",
            email: "rahul.patel@confidencefs.com",
            join_date: (2023, 1, 20),
            phone: "+91 9876543212",
            ctc: (900000, 75000),
            breakdown: [35000, 17500, 6000, 2500, 4200, 10000, -200],
            bank: ("ICICI Bank", "12345678903", "ICIC0001234"),
            education: ("B.Tech Computer Science", "IIT Delhi", "2022"),
            emergency: ("Meera Patel", "Mother", "+91 9876543213"),
        },
        SeedEmployee {
            id: "EMP004",
            name: "Anita Kumar",
            photo: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?w=40&h=40&fit=crop&crop=face",
            designation: "Marketing Specialist",
            department: "Marketing",
            email: "anita.kumar@confidencefs.com",
            join_date: (2022, 11, 5),
            phone: "+91 9876543213",
            ctc: (600000, 50000),
            breakdown: [22000, 11000, 3500, 1500, 2640, 5000, 4360],
            bank: ("Axis Bank", "12345678904", "UTIB0001234"),
            education: ("MBA Marketing", "Pune University", "2021"),
            emergency: ("Suresh Kumar", "Father", "+91 9876543214"),
        },
    ];

    seeds.iter().filter_map(SeedEmployee::build).collect()
}

/// Newest first, as the announcement board lists them.
pub fn sample_announcements() -> Vec<Announcement> {
    let seeds = [
        (
            1,
            "Q4 Performance Review Results",
            "Individual performance review results for Q4 2023 are now available. Please review your scores and feedback.",
            Priority::High,
            (2024, 1, 15),
            Some("q4-performance-results.pdf"),
        ),
        (
            2,
            "Annual Company Picnic - Save the Date",
            "Our annual company picnic is scheduled for March 15th, 2024. More details including venue and activities will be shared soon.",
            Priority::Medium,
            (2024, 1, 10),
            None,
        ),
        (
            3,
            "New Health Insurance Policy Updates",
            "We have updated our health insurance policy with enhanced coverage. Please review the new benefits and coverage details.",
            Priority::High,
            (2024, 1, 8),
            Some("health-insurance-updates.pdf"),
        ),
    ];

    seeds
        .into_iter()
        .filter_map(|(id, title, description, priority, (y, m, d), attachment)| {
            Some(Announcement {
                id,
                title: title.to_string(),
                description: description.to_string(),
                priority,
                date: NaiveDate::from_ymd_opt(y, m, d)?,
                attachment: attachment.map(str::to_string),
            })
        })
        .collect()
}
